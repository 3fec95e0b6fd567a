//! Match configuration.
//!
//! Every bot receives the configuration as its setup message, one
//! `<key> <value>` line per option: `loadtime`, `turntime` and `nplayers`
//! first, then any custom options in the order they were added.

use std::time::Duration;

use crate::error::ConfigError;

/// Default time a bot gets to answer the setup message.
pub const DEFAULT_LOAD_TIME: Duration = Duration::from_millis(100);

/// Default time a bot gets to answer each turn.
pub const DEFAULT_TURN_TIME: Duration = Duration::from_millis(100);

const LOAD_TIME_KEY: &str = "loadtime";
const TURN_TIME_KEY: &str = "turntime";
const PLAYERS_KEY: &str = "nplayers";

/// Configuration for one match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    /// Budget for the `ready` handshake, measured from the setup broadcast.
    pub load_time: Duration,

    /// Budget for collecting moves each turn.
    pub turn_time: Duration,

    /// Shuffle seed. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Extra setup options forwarded verbatim to the bots.
    options: Vec<(String, String)>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            load_time: DEFAULT_LOAD_TIME,
            turn_time: DEFAULT_TURN_TIME,
            seed: None,
            options: Vec::new(),
        }
    }
}

impl MatchConfig {
    /// Create a config with default budgets and a random seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handshake budget.
    #[must_use]
    pub fn with_load_time(mut self, load_time: Duration) -> Self {
        self.load_time = load_time;
        self
    }

    /// Set the per-turn budget.
    #[must_use]
    pub fn with_turn_time(mut self, turn_time: Duration) -> Self {
        self.turn_time = turn_time;
        self
    }

    /// Fix the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add or replace a setup option.
    ///
    /// `loadtime` and `turntime` are parsed as milliseconds and update the
    /// matching budget. `nplayers` is derived from the seats and rejected.
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.set_option(key.into(), value.into())?;
        Ok(self)
    }

    /// Parse a `key=value` pair as given on the command line.
    pub fn with_option_pair(self, pair: &str) -> Result<Self, ConfigError> {
        let (key, value) = pair
            .split_once('=')
            .filter(|(k, _)| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MalformedOption(pair.to_string()))?;
        self.with_option(key.trim(), value.trim())
    }

    fn set_option(&mut self, key: String, value: String) -> Result<(), ConfigError> {
        if key == PLAYERS_KEY {
            return Err(ConfigError::Reserved(key));
        }
        if key == LOAD_TIME_KEY || key == TURN_TIME_KEY {
            let budget = match value.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => return Err(ConfigError::InvalidValue { key, value }),
            };
            if key == LOAD_TIME_KEY {
                self.load_time = budget;
            } else {
                self.turn_time = budget;
            }
            return Ok(());
        }
        // Each option goes out as a single `<key> <value>` line.
        let is_word = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
        if !is_word(key.as_str()) || !is_word(value.as_str()) {
            return Err(ConfigError::InvalidValue { key, value });
        }

        let existing = self.options.iter().position(|(k, _)| *k == key);
        match existing {
            Some(i) => self.options[i].1 = value,
            None => self.options.push((key, value)),
        }
        Ok(())
    }

    /// Custom options in insertion order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The setup lines shared by every bot (without the `you` line).
    #[must_use]
    pub fn setup_lines(&self, player_count: usize) -> Vec<String> {
        let mut lines = vec![
            format!("{LOAD_TIME_KEY} {}", self.load_time.as_millis()),
            format!("{TURN_TIME_KEY} {}", self.turn_time.as_millis()),
            format!("{PLAYERS_KEY} {player_count}"),
        ];
        lines.extend(self.options().map(|(k, v)| format!("{k} {v}")));
        lines
    }
}
