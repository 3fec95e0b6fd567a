//! The room deck and the counters it carries between rounds.
//!
//! A fresh round deals every treasure, the surviving trap copies and the
//! artifacts accumulated so far, then shuffles them. Two counters outlive
//! the round:
//!
//! - trap copies per kind (start at 3, lose one each time that kind springs)
//! - the artifact accumulator (grows by one each round, cleared whenever a
//!   single player leaves alone)

use thiserror::Error;
use tracing::debug;

use super::card::{Card, TrapCounts, TrapType, TRAP_COPIES, TREASURES};
use crate::core::GameRng;

/// Raised when the room outlasts its cards.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("no cards left in the deck")]
pub struct DeckExhausted;

/// Shuffled card supply for the current round.
#[derive(Clone, Debug)]
pub struct Deck {
    /// Draw order is from the end.
    cards: Vec<Card>,
    trap_copies: TrapCounts,
    artifacts: u32,
    rng: GameRng,
}

impl Deck {
    /// Create a deck that shuffles with the given RNG.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self {
            cards: Vec::new(),
            trap_copies: TrapCounts::uniform(TRAP_COPIES),
            artifacts: 0,
            rng,
        }
    }

    /// Create a deck with a fixed shuffle seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    /// Seed of the shuffle stream.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Deal and shuffle the cards for a new round.
    pub fn start_round(&mut self) {
        self.artifacts += 1;

        let mut cards = Vec::with_capacity(self.round_size());
        cards.extend(TREASURES.iter().map(|&v| Card::Treasure(v)));
        for (trap, copies) in self.trap_copies.iter() {
            cards.extend((0..copies).map(|_| Card::Trap(trap)));
        }
        cards.extend((0..self.artifacts).map(|_| Card::Artifact));

        self.rng.shuffle(&mut cards);
        debug!(cards = cards.len(), artifacts = self.artifacts, "deck dealt");
        self.cards = cards;
    }

    /// Start a round with an explicit draw order (first card drawn first).
    ///
    /// The artifact accumulator advances exactly as in [`Deck::start_round`].
    pub fn start_round_with(&mut self, draw_order: Vec<Card>) {
        self.artifacts += 1;
        self.cards = draw_order;
        self.cards.reverse();
    }

    /// Number of cards a round dealt now would hold.
    #[must_use]
    pub fn round_size(&self) -> usize {
        TREASURES.len() + self.trap_copies.total() as usize + self.artifacts as usize
    }

    /// Draw the next card.
    pub fn draw(&mut self) -> Result<Card, DeckExhausted> {
        self.cards.pop().ok_or(DeckExhausted)
    }

    /// Cards left in the current round.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// The undrawn cards, next card last.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Copies of a trap kind dealt into future rounds.
    #[must_use]
    pub fn trap_copies(&self, trap: TrapType) -> u32 {
        self.trap_copies[trap]
    }

    /// A trap sprang: deal one copy fewer from now on.
    pub fn remove_trap_copy(&mut self, trap: TrapType) {
        self.trap_copies.take_one(trap);
    }

    /// Current value of the artifact accumulator.
    #[must_use]
    pub fn artifact_accumulator(&self) -> u32 {
        self.artifacts
    }

    /// A player left alone: the accumulator starts over.
    pub fn reset_artifacts(&mut self) {
        self.artifacts = 0;
    }
}
