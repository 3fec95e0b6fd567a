//! The line protocol between referee and bots.
//!
//! Every server message is a run of lines closed by `end`:
//!
//! ```text
//! loadtime 100        setup, once per match
//! turntime 100
//! nplayers 3
//! you 1
//! end
//!
//! turn 2 4            every turn: round, turn
//! players stay out stay
//! treasure 11         or `trap <kind>` or `artifact`
//! end
//! ```
//!
//! A bot answers setup with `ready` and every turn it is still inside
//! with `stay` or `leave`.

use std::str::FromStr;

use crate::cards::{Card, TrapType};
use crate::core::PlayerId;
use crate::error::ProtocolError;
use crate::rules::Move;

/// Handshake reply.
pub const READY: &str = "ready";

/// Closes every server message.
pub const END: &str = "end";

/// Whether a player is inside the room, as broadcast in `players` lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Stay,
    Out,
}

impl Status {
    #[must_use]
    pub const fn of(in_room: bool) -> Self {
        if in_room {
            Status::Stay
        } else {
            Status::Out
        }
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Status::Stay => "stay",
            Status::Out => "out",
        }
    }
}

impl FromStr for Status {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stay" => Ok(Status::Stay),
            "out" => Ok(Status::Out),
            other => Err(ProtocolError::Malformed(other.to_string())),
        }
    }
}

impl FromStr for Move {
    type Err = ProtocolError;

    /// Exact tokens only; callers trim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stay" => Ok(Move::Stay),
            "leave" => Ok(Move::Leave),
            "" => Err(ProtocolError::Empty),
            other => Err(ProtocolError::Malformed(other.to_string())),
        }
    }
}

/// Setup message body for one player (without `end`).
#[must_use]
pub fn setup_lines(shared: &[String], you: PlayerId) -> Vec<String> {
    let mut lines = shared.to_vec();
    lines.push(format!("you {}", you.0));
    lines
}

/// Turn message body (without `end`).
#[must_use]
pub fn turn_lines(round: u32, turn: u32, statuses: &[Status], card: Card) -> Vec<String> {
    let players = statuses
        .iter()
        .fold(String::from("players"), |mut line, status| {
            line.push(' ');
            line.push_str(status.token());
            line
        });
    vec![format!("turn {round} {turn}"), players, card.to_string()]
}

/// One line of a server message, as a bot sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerLine {
    /// `<key> <value>` setup option, including `loadtime`, `turntime` and
    /// `nplayers`.
    Option { key: String, value: String },
    You(PlayerId),
    Turn { round: u32, turn: u32 },
    Players(Vec<Status>),
    Event(Card),
    End,
}

impl FromStr for ServerLine {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::Malformed(line.to_string());
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ProtocolError::Empty)?;
        let rest: Vec<&str> = words.collect();

        let parsed = match (head, rest.as_slice()) {
            ("end", []) => ServerLine::End,
            ("artifact", []) => ServerLine::Event(Card::Artifact),
            ("trap", [name]) => ServerLine::Event(Card::Trap(TrapType::from_name(name)?)),
            ("treasure", [value]) => {
                ServerLine::Event(Card::Treasure(value.parse().map_err(|_| malformed())?))
            }
            ("you", [index]) => {
                ServerLine::You(PlayerId(index.parse().map_err(|_| malformed())?))
            }
            ("turn", [round, turn]) => ServerLine::Turn {
                round: round.parse().map_err(|_| malformed())?,
                turn: turn.parse().map_err(|_| malformed())?,
            },
            ("players", statuses) => ServerLine::Players(
                statuses
                    .iter()
                    .map(|s| s.parse())
                    .collect::<Result<_, _>>()?,
            ),
            ("end" | "artifact" | "trap" | "treasure" | "you" | "turn", _) => {
                return Err(malformed())
            }
            (key, [value]) => ServerLine::Option {
                key: key.to_string(),
                value: value.to_string(),
            },
            _ => return Err(malformed()),
        };
        Ok(parsed)
    }
}
