//! `wargame resolve`: one seeded resolution.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use wargame_runtime::RandDice;

use super::ScenarioArgs;
use crate::output::{OutputFormat, print_json, print_result};

/// Resolve one attack
#[derive(Parser)]
pub struct Resolve {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Seed for the dice stream (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Roll saves even when none can succeed
    #[arg(long)]
    force_full_rolls: bool,

    /// Print every die
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Resolve {
    pub fn execute(self) -> Result<()> {
        let (loaded, config) = self.scenario.load()?;
        let mut options = self.scenario.options(&loaded);
        options.force_full_rolls |= self.force_full_rolls;

        let seed = self.seed.unwrap_or_else(clock_seed);
        tracing::info!(scenario = %loaded.scenario.name, seed, "resolving");

        let engagement = loaded.engagement_with(options)?;
        let outcome = engagement.resolve_with_config(&mut RandDice::seeded(seed), &config)?;

        match self.format {
            OutputFormat::Json => print_json(&outcome.result),
            OutputFormat::Text => {
                print_result(&outcome.result, self.verbose);
                println!("  seed {seed}");
                Ok(())
            }
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
