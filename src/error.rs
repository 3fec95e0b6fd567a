//! Error types for the referee.
//!
//! Every fault aborts the match. Faults caused by a bot carry the
//! offending [`PlayerId`] so the runner can report who broke the game.
//! Timeouts are never errors: a silent bot is defaulted to `leave`.

use std::io;

use thiserror::Error;

use crate::core::PlayerId;

pub type Result<T> = std::result::Result<T, GameError>;

/// Failures of a single process channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to start `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("empty command line")]
    EmptyCommand,

    #[error("cannot split command line `{command}`")]
    Unparsable { command: String },

    #[error("process has exited")]
    Closed,
}

/// Match-level faults.
#[derive(Debug, Error)]
pub enum GameError {
    /// A bot program could not be started.
    #[error("{player} could not be launched: {source}")]
    Launch {
        player: PlayerId,
        #[source]
        source: ChannelError,
    },

    /// A bot failed the handshake or its process died.
    #[error("{player} crashed: {reason}")]
    BadBot { player: PlayerId, reason: String },

    /// A bot replied with something other than `stay` or `leave`.
    #[error("{player} made an invalid move: {token:?}")]
    InvalidMove { player: PlayerId, token: String },

    /// The room outlasted the card supply. Never the fault of a bot.
    #[error("deck exhausted in round {round}, turn {turn}")]
    DeckExhausted { round: u32, turn: u32 },
}

impl GameError {
    /// The player blamed for this fault, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameError::Launch { player, .. }
            | GameError::BadBot { player, .. }
            | GameError::InvalidMove { player, .. } => Some(*player),
            GameError::DeckExhausted { .. } => None,
        }
    }

    pub(crate) fn bad_bot(player: PlayerId, reason: impl Into<String>) -> Self {
        GameError::BadBot {
            player,
            reason: reason.into(),
        }
    }
}

/// Invalid match options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option `{0}` is derived from the seats and cannot be set")]
    Reserved(String),

    #[error("option `{key}` has invalid value `{value}`")]
    InvalidValue { key: String, value: String },

    #[error("expected key=value, got `{0}`")]
    MalformedOption(String),
}

/// Lines a bot could not make sense of.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown trap `{0}`")]
    UnknownTrap(String),

    #[error("malformed line `{0}`")]
    Malformed(String),

    #[error("empty line")]
    Empty,
}
