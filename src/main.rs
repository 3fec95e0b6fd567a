//! temple-run - match runner
//!
//! Launches one bot process per command line argument, referees a full
//! match between them, and prints the standings on stdout. Logs go to
//! stderr.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use temple_run::{BotPlayer, Game, MatchConfig, PlayerId, Standings};

/// Referee a match between bot programs.
#[derive(Parser, Debug)]
#[command(name = "temple-run", version, about)]
struct Config {
    /// Bot command lines, one per player, in seat order.
    #[arg(required = true, value_name = "BOT")]
    bots: Vec<String>,

    /// Handshake budget in milliseconds.
    #[arg(long, env = "TEMPLE_LOADTIME", default_value_t = 100)]
    loadtime: u64,

    /// Per-turn budget in milliseconds.
    #[arg(long, env = "TEMPLE_TURNTIME", default_value_t = 100)]
    turntime: u64,

    /// Deck seed. Random when omitted.
    #[arg(long, env = "TEMPLE_SEED")]
    seed: Option<u64>,

    /// Extra setup option sent to every bot.
    #[arg(long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Working directory for the bots.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Print standings as JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[arg(long, env = "TEMPLE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Config {
    fn match_config(&self) -> Result<MatchConfig> {
        let mut config = MatchConfig::new()
            .with_load_time(Duration::from_millis(self.loadtime))
            .with_turn_time(Duration::from_millis(self.turntime));
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        for pair in &self.options {
            config = config
                .with_option_pair(pair)
                .with_context(|| format!("bad --option {pair}"))?;
        }
        Ok(config)
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Start every bot. If one fails, the ones already running are stopped.
async fn launch_bots(config: &Config) -> Result<Vec<BotPlayer>> {
    if config.bots.len() > usize::from(u8::MAX) {
        anyhow::bail!("at most {} bots can be seated", u8::MAX);
    }

    let mut bots = Vec::with_capacity(config.bots.len());
    for (index, command) in config.bots.iter().enumerate() {
        let id = PlayerId::new(index as u8);
        match BotPlayer::launch(id, command, config.cwd.as_deref()) {
            Ok(bot) => bots.push(bot),
            Err(err) => {
                for bot in &mut bots {
                    bot.channel_mut().kill().await;
                }
                return Err(err.into());
            }
        }
    }
    Ok(bots)
}

fn print_standings(standings: &Standings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(standings)?);
    } else {
        for (player, wealth) in standings.iter() {
            println!("{player}: {wealth}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level)?;

    let match_config = config.match_config()?;
    let bots = launch_bots(&config).await?;
    info!(bots = bots.len(), "bots launched");

    let mut game = Game::new(bots, match_config);
    let outcome = game.play().await;
    game.shutdown().await;

    match outcome {
        Ok(standings) => print_standings(&standings, config.json),
        Err(err) => {
            match err.player() {
                Some(player) => error!(%player, "match aborted: {err}"),
                None => error!("match aborted: {err}"),
            }
            Err(err.into())
        }
    }
}
