//! Game rules: the room, the `Seat` seam and the match engine.
//!
//! `Room` holds the pure bookkeeping of one round and can be exercised
//! without any players attached. `Game` drives rounds against a set of
//! `Seat`s and never interprets the transport behind them.

pub mod engine;
pub mod room;
pub mod seat;

pub use engine::{Game, MatchPhase, RoundEnd, RoundSummary, Standings};
pub use room::{ArtifactLedger, LeaveBatch, Room};
pub use seat::{Move, Seat};
