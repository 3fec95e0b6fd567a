//! Cards and the room deck.
//!
//! ## Key Types
//!
//! - `Card`: treasure, trap or artifact
//! - `TrapType`: the five trap kinds
//! - `TrapCounts`: one counter per trap kind
//! - `Deck`: shuffled supply for a round, plus cross-round counters

pub mod card;
pub mod deck;

pub use card::{
    Card, TrapCounts, TrapType, ARTIFACT_VALUES, ROUNDS, TRAP_COPIES, TRAP_TRIGGER, TREASURES,
};
pub use deck::{Deck, DeckExhausted};
