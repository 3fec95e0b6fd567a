//! Scripted in-memory seats for driving the engine without processes.

#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::time::Instant;

use temple_run::core::PlayerId;
use temple_run::error::{GameError, Result};
use temple_run::rules::{Move, Seat};

/// One scripted answer to a move poll.
#[derive(Clone, Debug)]
pub enum Reply {
    Move(Move),
    /// Say nothing before the deadline.
    Silent,
    /// Answer with an arbitrary token.
    Token(String),
}

/// A seat that replays a fixed script and records what it was told.
#[derive(Debug)]
pub struct ScriptedSeat {
    id: PlayerId,
    /// Handshake answer; `None` stays silent.
    pub ready_line: Option<String>,
    replies: VecDeque<Reply>,
    /// Answer once the script runs out.
    pub fallback: Reply,
    /// Every message received, each ending in `end`.
    pub heard: Vec<Vec<String>>,
    pub polls: usize,
    pub alive: bool,
    pub shutdowns: usize,
}

impl ScriptedSeat {
    pub fn new(id: u8) -> Self {
        Self {
            id: PlayerId::new(id),
            ready_line: Some("ready".to_string()),
            replies: VecDeque::new(),
            fallback: Reply::Move(Move::Leave),
            heard: Vec::new(),
            polls: 0,
            alive: true,
            shutdowns: 0,
        }
    }

    /// Queue moves, answered one per poll.
    pub fn moves(mut self, moves: &[Move]) -> Self {
        self.replies.extend(moves.iter().copied().map(Reply::Move));
        self
    }

    pub fn then(mut self, reply: Reply) -> Self {
        self.replies.push_back(reply);
        self
    }

    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn answering_ready_with(mut self, line: Option<&str>) -> Self {
        self.ready_line = line.map(str::to_string);
        self
    }

    /// Messages whose first line starts with `turn`.
    pub fn turns_heard(&self) -> Vec<&Vec<String>> {
        self.heard
            .iter()
            .filter(|m| m.first().is_some_and(|l| l.starts_with("turn ")))
            .collect()
    }
}

#[async_trait]
impl Seat for ScriptedSeat {
    fn id(&self) -> PlayerId {
        self.id
    }

    async fn tell(&mut self, lines: &[String]) -> Result<()> {
        if !self.alive {
            return Err(GameError::BadBot {
                player: self.id,
                reason: "process has exited".to_string(),
            });
        }
        let mut message = lines.to_vec();
        message.push("end".to_string());
        self.heard.push(message);
        Ok(())
    }

    async fn await_ready(&mut self, _deadline: Instant) -> Result<()> {
        match self.ready_line.as_deref() {
            Some("ready") => Ok(()),
            Some(other) => Err(GameError::BadBot {
                player: self.id,
                reason: format!("expected `ready`, got {other:?}"),
            }),
            None => Err(GameError::BadBot {
                player: self.id,
                reason: "no `ready` before the load time ran out".to_string(),
            }),
        }
    }

    async fn poll_move(&mut self, _deadline: Instant) -> Result<Option<Move>> {
        self.polls += 1;
        let reply = self
            .replies
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            Reply::Move(m) => Ok(Some(m)),
            Reply::Silent => Ok(None),
            Reply::Token(token) => match token.parse::<Move>() {
                Ok(m) => Ok(Some(m)),
                Err(_) => Err(GameError::InvalidMove {
                    player: self.id,
                    token,
                }),
            },
        }
    }

    fn is_alive(&mut self) -> bool {
        self.alive
    }

    async fn shutdown(&mut self) {
        self.alive = false;
        self.shutdowns += 1;
    }
}
