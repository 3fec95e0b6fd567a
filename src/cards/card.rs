//! Card model and the fixed tables of the game.
//!
//! A room deck holds three kinds of card:
//! - treasure, worth a fixed amount that is split among the players present
//! - traps of five kinds; the second of a kind in one room ends the round
//! - artifacts, worth something only to a player who leaves alone

use serde::{Deserialize, Serialize};
use std::ops::Index;

use crate::error::ProtocolError;

/// Treasure denominations dealt into every room.
pub const TREASURES: [u32; 15] = [1, 2, 3, 4, 5, 5, 7, 7, 9, 11, 11, 13, 14, 15, 17];

/// Value of the n-th artifact claimed in the match.
pub const ARTIFACT_VALUES: [u32; 5] = [5, 5, 5, 10, 10];

/// Copies of each trap kind in the first round.
pub const TRAP_COPIES: u32 = 3;

/// Occurrences of one trap kind that end the round.
pub const TRAP_TRIGGER: u32 = 2;

/// Rounds in a match.
pub const ROUNDS: u32 = 5;

/// The five trap kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrapType {
    Fire,
    Mummy,
    Rockslide,
    Snakes,
    Spiders,
}

impl TrapType {
    /// All trap kinds in table order.
    pub const ALL: [TrapType; 5] = [
        TrapType::Fire,
        TrapType::Mummy,
        TrapType::Rockslide,
        TrapType::Snakes,
        TrapType::Spiders,
    ];

    /// Position of this kind in per-kind tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire name used in `trap <name>` event lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TrapType::Fire => "fire",
            TrapType::Mummy => "mummy",
            TrapType::Rockslide => "rockslide",
            TrapType::Snakes => "snake",
            TrapType::Spiders => "spiders",
        }
    }

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Result<Self, ProtocolError> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ProtocolError::UnknownTrap(name.to_string()))
    }
}

impl std::fmt::Display for TrapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single card drawn into the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Card {
    Trap(TrapType),
    Treasure(u32),
    Artifact,
}

/// Renders the event line broadcast for this card.
impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Card::Trap(t) => write!(f, "trap {}", t.name()),
            Card::Treasure(v) => write!(f, "treasure {v}"),
            Card::Artifact => f.write_str("artifact"),
        }
    }
}

/// One counter per trap kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapCounts([u32; 5]);

impl TrapCounts {
    /// Every kind set to `n`.
    #[must_use]
    pub const fn uniform(n: u32) -> Self {
        Self([n; 5])
    }

    /// Increment a kind and return its new count.
    pub fn bump(&mut self, trap: TrapType) -> u32 {
        let slot = &mut self.0[trap.index()];
        *slot += 1;
        *slot
    }

    /// Decrement a kind, stopping at zero.
    pub fn take_one(&mut self, trap: TrapType) {
        let slot = &mut self.0[trap.index()];
        *slot = slot.saturating_sub(1);
    }

    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrapType, u32)> + '_ {
        TrapType::ALL.into_iter().map(|t| (t, self.0[t.index()]))
    }
}

impl Index<TrapType> for TrapCounts {
    type Output = u32;

    fn index(&self, trap: TrapType) -> &Self::Output {
        &self.0[trap.index()]
    }
}
