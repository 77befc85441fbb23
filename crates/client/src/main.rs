//! Command-line front end for the wargame engine.
//!
//! Every command works on a data directory holding a rule catalog and named
//! scenarios (see `wargame_content::ContentFactory`):
//!
//! ```bash
//! wargame resolve intercessors_vs_warriors --seed 7
//! wargame simulate lascannon_vs_tank --trials 10000 --shards 4
//! wargame explain intercessors_vs_warriors --format json
//! wargame validate
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Explain, Resolve, Simulate, Validate};

/// Rule evaluation and combat resolution for tabletop wargames
#[derive(Parser)]
#[command(name = "wargame")]
#[command(about = "Rule evaluation and combat resolution", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Resolve one attack with a seeded dice stream
    Resolve(Resolve),

    /// Run many resolutions and report damage statistics
    Simulate(Simulate),

    /// Show which rules apply and where every modifier comes from
    Explain(Explain),

    /// Check a rule catalog and its scenarios for structural problems
    Validate(Validate),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute().await,
        Command::Explain(cmd) => cmd.execute(),
        Command::Validate(cmd) => cmd.execute(),
    }
}
