//! sandbox - poke a single bot by hand
//!
//! Starts one command in a process channel, feeds it the given lines and
//! prints whatever it answers until it goes quiet.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use temple_run::ProcessChannel;

#[derive(Parser, Debug)]
#[command(name = "sandbox", about = "Talk to one bot process line by line")]
struct Args {
    /// Command line to run.
    command: String,

    /// Working directory for the process.
    #[arg(short = 'd', long, visible_alias = "directory")]
    cwd: Option<PathBuf>,

    /// Line to send. Repeatable; sent in order.
    #[arg(short, long = "line")]
    lines: Vec<String>,

    /// Seconds to pause after each sent line.
    #[arg(long, default_value_t = 0.0)]
    send_delay: f64,

    /// Stop once no response arrives for this many seconds.
    #[arg(long, default_value_t = 1.0)]
    receive_wait: f64,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut channel = ProcessChannel::start_in(&args.command, args.cwd.as_deref())?;
    info!(pid = channel.pid(), command = %args.command, "started");

    for line in &args.lines {
        if let Err(err) = channel.write_line(line) {
            info!(%err, "process stopped accepting input");
            break;
        }
        println!("> {line}");
        tokio::time::sleep(seconds(args.send_delay)).await;
    }

    while let Some(line) = channel.read_line(seconds(args.receive_wait)).await {
        println!("< {line}");
    }

    let status = channel.kill().await;
    info!(?status, "stopped");
    Ok(())
}
