//! Core types: players, RNG, configuration.

pub mod config;
pub mod player;
pub mod rng;

pub use config::{MatchConfig, DEFAULT_LOAD_TIME, DEFAULT_TURN_TIME};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
