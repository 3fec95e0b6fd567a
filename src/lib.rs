//! # temple-run
//!
//! Referee for a push-your-luck card game played by autonomous bot
//! programs over stdin/stdout.
//!
//! ## Design Principles
//!
//! 1. **Bots are untrusted**: every wait is bounded by a deadline, a silent
//!    bot is defaulted to `leave`, and any protocol fault ends the match
//!    with the offending player named.
//!
//! 2. **Engine is transport-agnostic**: `Game` talks to `Seat`s. Processes
//!    live behind `BotPlayer`; tests plug in scripted seats.
//!
//! 3. **Deterministic when seeded**: the deck shuffles with a ChaCha8
//!    `GameRng`, so a seed replays a match card for card.
//!
//! ## Modules
//!
//! - `core`: players, RNG, match configuration
//! - `cards`: card model, fixed tables, the deck
//! - `rules`: room bookkeeping, the `Seat` trait, the match engine
//! - `channel`: line-oriented pipes to child processes
//! - `proxy`: wire protocol and the process-backed seat
//! - `error`: error types

pub mod cards;
pub mod channel;
pub mod core;
pub mod error;
pub mod proxy;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{GameRng, MatchConfig, PlayerId, PlayerMap};

pub use crate::cards::{Card, Deck, TrapType};

pub use crate::rules::{Game, MatchPhase, Move, RoundEnd, RoundSummary, Seat, Standings};

pub use crate::channel::ProcessChannel;

pub use crate::proxy::BotPlayer;

pub use crate::error::{ChannelError, ConfigError, GameError, ProtocolError, Result};
