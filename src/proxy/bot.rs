//! A seat backed by a bot process.

use std::iter;
use std::path::Path;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use super::protocol::{END, READY};
use crate::channel::ProcessChannel;
use crate::core::PlayerId;
use crate::error::{GameError, Result};
use crate::rules::{Move, Seat};

/// One bot process playing one seat.
#[derive(Debug)]
pub struct BotPlayer {
    id: PlayerId,
    channel: ProcessChannel,
}

impl BotPlayer {
    /// Start the bot for seat `id`.
    pub fn launch(id: PlayerId, command: &str, cwd: Option<&Path>) -> Result<Self> {
        let channel = ProcessChannel::start_in(command, cwd)
            .map_err(|source| GameError::Launch { player: id, source })?;
        debug!(player = %id, command, "bot launched");
        Ok(Self { id, channel })
    }

    #[must_use]
    pub fn channel(&self) -> &ProcessChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut ProcessChannel {
        &mut self.channel
    }
}

#[async_trait]
impl Seat for BotPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    async fn tell(&mut self, lines: &[String]) -> Result<()> {
        for line in lines.iter().map(String::as_str).chain(iter::once(END)) {
            self.channel
                .write_line(line)
                .map_err(|err| GameError::bad_bot(self.id, err.to_string()))?;
        }
        Ok(())
    }

    async fn await_ready(&mut self, deadline: Instant) -> Result<()> {
        match self.channel.read_line_by(deadline).await {
            Some(line) if line == READY => Ok(()),
            Some(line) => Err(GameError::bad_bot(
                self.id,
                format!("expected `{READY}`, got {line:?}"),
            )),
            None if self.channel.is_finished() => {
                Err(GameError::bad_bot(self.id, "exited before `ready`"))
            }
            None => Err(GameError::bad_bot(
                self.id,
                format!("no `{READY}` before the load time ran out"),
            )),
        }
    }

    async fn poll_move(&mut self, deadline: Instant) -> Result<Option<Move>> {
        while let Some(line) = self.channel.read_line_by(deadline).await {
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            return token
                .parse()
                .map(Some)
                .map_err(|_| GameError::InvalidMove {
                    player: self.id,
                    token: token.to_string(),
                });
        }
        if self.channel.is_finished() {
            return Err(GameError::bad_bot(self.id, "exited before moving"));
        }
        Ok(None)
    }

    fn is_alive(&mut self) -> bool {
        self.channel.is_alive()
    }

    async fn shutdown(&mut self) {
        if let Some(status) = self.channel.kill().await {
            debug!(player = %self.id, %status, "bot stopped");
        }
    }
}
