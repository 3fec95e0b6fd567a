//! randombot - reference bot
//!
//! Answers the handshake with `ready`, then stays in the room until a
//! 1-in-11 coin says leave. Silent while out.

use anyhow::Result;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use temple_run::core::{GameRng, PlayerId};
use temple_run::proxy::{ServerLine, Status, READY};
use temple_run::Move;

#[derive(Parser, Debug)]
#[command(name = "randombot", about = "Plays temple-run moves at random")]
struct Args {
    /// RNG seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

/// What the bot has learned from the current message so far.
#[derive(Debug, Default)]
struct Bot {
    me: Option<PlayerId>,
    statuses: Option<Vec<Status>>,
}

impl Bot {
    /// Reply owed at the end of a message, if any.
    fn reply(&self, rng: &mut GameRng) -> Option<&'static str> {
        let Some(statuses) = &self.statuses else {
            return Some(READY);
        };
        let inside = self
            .me
            .and_then(|me| statuses.get(me.index()))
            .is_some_and(|s| *s == Status::Stay);
        if !inside {
            return None;
        }
        let choice = if rng.gen_ratio(1, 11) {
            Move::Leave
        } else {
            Move::Stay
        };
        Some(choice.token())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = args.seed.map_or_else(GameRng::from_entropy, GameRng::new);

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut bot = Bot::default();

    while let Some(line) = lines.next_line().await? {
        let Ok(parsed) = line.parse::<ServerLine>() else {
            continue;
        };
        match parsed {
            ServerLine::You(me) => bot.me = Some(me),
            ServerLine::Players(statuses) => bot.statuses = Some(statuses),
            ServerLine::End => {
                if let Some(reply) = bot.reply(&mut rng) {
                    stdout.write_all(reply.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
