//! The seam between the engine and whatever answers for a player.
//!
//! The engine never touches processes directly. It talks to a `Seat`,
//! which in production is a [`BotPlayer`](crate::proxy::BotPlayer) wrapping
//! a child process, and in tests can be any scripted stand-in.

use async_trait::async_trait;
use tokio::time::Instant;

use crate::core::PlayerId;
use crate::error::Result;

/// A player's decision for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Stay,
    Leave,
}

impl Move {
    /// Wire token for this move.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Move::Stay => "stay",
            Move::Leave => "leave",
        }
    }
}

/// One player's connection to the match.
///
/// Every wait is bounded by the deadline the engine passes in.
#[async_trait]
pub trait Seat: Send {
    /// Seat index of this player.
    fn id(&self) -> PlayerId;

    /// Deliver one message. Implementations terminate it with `end`.
    ///
    /// Telling a player whose process is gone is a `BadBot` fault.
    async fn tell(&mut self, lines: &[String]) -> Result<()>;

    /// Wait for the `ready` handshake until `deadline`.
    async fn await_ready(&mut self, deadline: Instant) -> Result<()>;

    /// Wait for a move until `deadline`. `Ok(None)` means no answer in time.
    async fn poll_move(&mut self, deadline: Instant) -> Result<Option<Move>>;

    /// Whether the player can still be reached.
    fn is_alive(&mut self) -> bool;

    /// Release the player's resources. Safe to call more than once.
    async fn shutdown(&mut self);
}
