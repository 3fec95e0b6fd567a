//! Per-round room state and the wealth-splitting rules.
//!
//! ## Treasure
//!
//! A treasure worth `v` drawn with `n` players in the room adds `v / n` to
//! `wealth_held`, the share every player present is owed, and parks the
//! leftover `v % n` in `pending` under the draw it came from.
//!
//! ## Leaving
//!
//! The `k` players leaving in the same turn each take `wealth_held` plus
//! `r / k` from every pending leftover `r`; `r % k` stays behind for
//! whoever leaves later. A player leaving alone also claims every artifact
//! seen in the room this round, valued from the match-wide ledger. The
//! artifacts stay counted, so a later lone leaver claims them again at the
//! next table positions.

use smallvec::SmallVec;

use crate::cards::{Card, TrapCounts, TrapType, ARTIFACT_VALUES, TRAP_TRIGGER};
use crate::core::{PlayerId, PlayerMap};

/// Artifacts claimed over the whole match.
///
/// Claims are valued in order against [`ARTIFACT_VALUES`]; claims past the
/// end of the table are worth nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArtifactLedger {
    taken: u32,
}

impl ArtifactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts claimed so far.
    #[must_use]
    pub fn taken(&self) -> u32 {
        self.taken
    }

    /// Value of the next `count` artifacts, without claiming them.
    #[must_use]
    pub fn value_of(&self, count: u32) -> u32 {
        (self.taken..self.taken + count)
            .map(|i| ARTIFACT_VALUES.get(i as usize).copied().unwrap_or(0))
            .sum()
    }

    /// Claim `count` artifacts and return their value.
    pub fn claim(&mut self, count: u32) -> u32 {
        let value = self.value_of(count);
        self.taken += count;
        value
    }
}

/// Result of resolving one turn's leave batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeaveBatch {
    /// Players who left this turn.
    pub leavers: SmallVec<[PlayerId; 8]>,
    /// Treasure paid to each leaver.
    pub share: u32,
    /// Artifacts claimed (only by a sole leaver).
    pub artifacts: u32,
    /// Value of the claimed artifacts.
    pub artifact_value: u32,
}

impl LeaveBatch {
    /// What each leaver adds to their wealth.
    #[must_use]
    pub fn payout(&self) -> u32 {
        self.share + self.artifact_value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leavers.is_empty()
    }

    /// Exactly one player left.
    #[must_use]
    pub fn is_sole(&self) -> bool {
        self.leavers.len() == 1
    }
}

/// Shared state of the room during one round.
#[derive(Clone, Debug)]
pub struct Room {
    wealth_held: u32,
    pending: Vec<u32>,
    traps: TrapCounts,
    artifacts_seen: u32,
    in_room: PlayerMap<bool>,
}

impl Room {
    /// Everybody enters an empty room.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            wealth_held: 0,
            pending: Vec::new(),
            traps: TrapCounts::default(),
            artifacts_seen: 0,
            in_room: PlayerMap::with_value(player_count, true),
        }
    }

    /// Share already owed to each player still in the room.
    #[must_use]
    pub fn wealth_held(&self) -> u32 {
        self.wealth_held
    }

    /// Undivided leftovers, one per treasure drawn, in draw order.
    #[must_use]
    pub fn pending(&self) -> &[u32] {
        &self.pending
    }

    #[must_use]
    pub fn trap_counts(&self) -> &TrapCounts {
        &self.traps
    }

    /// Artifacts revealed this round.
    #[must_use]
    pub fn artifacts_seen(&self) -> u32 {
        self.artifacts_seen
    }

    #[must_use]
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.in_room[player]
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.in_room.values().filter(|&&inside| inside).count()
    }

    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.in_room
            .iter()
            .filter(|(_, inside)| **inside)
            .map(|(p, _)| p)
    }

    /// Everybody has left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Apply a drawn card. Returns the trap kind if it just sprang.
    pub fn reveal(&mut self, card: Card) -> Option<TrapType> {
        match card {
            Card::Treasure(value) => {
                let present = self.active_count() as u32;
                if present == 0 {
                    self.pending.push(value);
                } else {
                    self.wealth_held += value / present;
                    self.pending.push(value % present);
                }
                None
            }
            Card::Trap(trap) => (self.traps.bump(trap) == TRAP_TRIGGER).then_some(trap),
            Card::Artifact => {
                self.artifacts_seen += 1;
                None
            }
        }
    }

    /// Pay out the players leaving this turn and mark them out.
    ///
    /// Players already out and duplicate entries are ignored.
    pub fn resolve_leaves(
        &mut self,
        leaving: &[PlayerId],
        ledger: &mut ArtifactLedger,
    ) -> LeaveBatch {
        let mut leavers: SmallVec<[PlayerId; 8]> = SmallVec::new();
        for &player in leaving {
            if self.in_room[player] && !leavers.contains(&player) {
                leavers.push(player);
            }
        }

        let k = leavers.len() as u32;
        if k == 0 {
            return LeaveBatch::default();
        }

        let mut share = self.wealth_held;
        for leftover in &mut self.pending {
            share += *leftover / k;
            *leftover %= k;
        }

        let (artifacts, artifact_value) = if k == 1 {
            let count = self.artifacts_seen;
            (count, ledger.claim(count))
        } else {
            (0, 0)
        };

        for &player in &leavers {
            self.in_room[player] = false;
        }

        LeaveBatch {
            leavers,
            share,
            artifacts,
            artifact_value,
        }
    }
}
