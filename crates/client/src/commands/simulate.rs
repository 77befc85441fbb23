//! `wargame simulate`: damage statistics over many trials.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use console::style;
use wargame_runtime::{SimulationConfig, SimulationReport, Simulator};

use super::ScenarioArgs;
use crate::output::{OutputFormat, heading, print_json};

const BAR_WIDTH: f64 = 40.0;

/// Run many resolutions of one scenario
#[derive(Parser)]
pub struct Simulate {
    #[command(flatten)]
    scenario: ScenarioArgs,

    /// Number of resolutions
    #[arg(short = 'n', long, default_value_t = 1_000)]
    trials: u32,

    /// Base seed; shard streams are derived from it
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Worker shards
    #[arg(long, default_value_t = 1)]
    shards: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Simulate {
    pub async fn execute(self) -> Result<()> {
        let (mut loaded, engine) = self.scenario.load()?;
        loaded.scenario.options = self.scenario.options(&loaded);

        let simulator = Simulator::new(SimulationConfig {
            trials: self.trials,
            seed: self.seed,
            shards: self.shards,
        })
        .with_engine_config(engine);

        let name = loaded.scenario.name.clone();
        let report = simulator.run_sharded(Arc::new(loaded)).await?;

        match self.format {
            OutputFormat::Json => print_json(&report),
            OutputFormat::Text => {
                print_report(&name, &report);
                Ok(())
            }
        }
    }
}

fn print_report(name: &str, report: &SimulationReport) {
    heading(&format!("{name} ({} trials)", report.trials));
    println!(
        "  damage mean {:.2}  sd {:.2}  min {}  max {}",
        report.mean_damage, report.std_dev, report.min_damage, report.max_damage
    );
    println!(
        "  mean hits {:.2}  mean wounds {:.2}",
        report.mean_hits, report.mean_wounds
    );
    println!();

    let peak = report.histogram.values().copied().max().unwrap_or(1).max(1);
    for (&damage, &count) in &report.histogram {
        let width = (f64::from(count) / f64::from(peak) * BAR_WIDTH).round() as usize;
        println!(
            "  {:>3} {} {:>5.1}%  ≥ {:>5.1}%",
            damage,
            style("█".repeat(width.max(1))).cyan(),
            f64::from(count) * 100.0 / f64::from(report.trials),
            report.at_least(damage) * 100.0
        );
    }
}
