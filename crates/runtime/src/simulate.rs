//! Monte-Carlo damage statistics.
//!
//! Every trial builds a fresh engagement and resolves it with its own slice of
//! the dice stream, so trials never share accumulators. Shards split the trial
//! count and each owns an RNG seeded from `(seed, shard)`; results are merged
//! in shard order, which keeps a report reproducible for a given
//! [`SimulationConfig`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use wargame_content::LoadedScenario;
use wargame_core::{CombatSummary, DiceSource, EngineConfig, mix_seed};

use crate::dice::RandDice;
use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    pub trials: u32,
    pub seed: u64,
    /// Blocking workers used by [`Simulator::run_sharded`]; `0` counts as one.
    pub shards: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 1_000,
            seed: 0,
            shards: 1,
        }
    }
}

/// Aggregate outcome of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    pub trials: u32,
    pub mean_damage: f64,
    pub std_dev: f64,
    pub min_damage: u32,
    pub max_damage: u32,
    pub mean_hits: f64,
    pub mean_wounds: f64,
    /// Trials per final damage value.
    pub histogram: BTreeMap<u32, u32>,
}

impl SimulationReport {
    /// Share of trials dealing at least `damage`.
    pub fn at_least(&self, damage: u32) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let hits: u32 = self.histogram.range(damage..).map(|(_, n)| n).sum();
        f64::from(hits) / f64::from(self.trials)
    }
}

#[derive(Clone, Debug, Default)]
struct Tally {
    trials: u32,
    damage: u64,
    damage_sq: u64,
    hits: u64,
    wounds: u64,
    min: Option<u32>,
    max: u32,
    histogram: BTreeMap<u32, u32>,
}

impl Tally {
    fn record(&mut self, summary: &CombatSummary) {
        let damage = summary.final_damage;
        self.trials += 1;
        self.damage += u64::from(damage);
        self.damage_sq += u64::from(damage) * u64::from(damage);
        self.hits += u64::from(summary.hits);
        self.wounds += u64::from(summary.wounds);
        self.min = Some(self.min.map_or(damage, |m| m.min(damage)));
        self.max = self.max.max(damage);
        *self.histogram.entry(damage).or_default() += 1;
    }

    fn merge(&mut self, other: Tally) {
        self.trials += other.trials;
        self.damage += other.damage;
        self.damage_sq += other.damage_sq;
        self.hits += other.hits;
        self.wounds += other.wounds;
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max = self.max.max(other.max);
        for (damage, count) in other.histogram {
            *self.histogram.entry(damage).or_default() += count;
        }
    }

    fn into_report(self) -> SimulationReport {
        let n = f64::from(self.trials.max(1));
        let mean = self.damage as f64 / n;
        let variance = (self.damage_sq as f64 / n - mean * mean).max(0.0);
        SimulationReport {
            trials: self.trials,
            mean_damage: mean,
            std_dev: variance.sqrt(),
            min_damage: self.min.unwrap_or(0),
            max_damage: self.max,
            mean_hits: self.hits as f64 / n,
            mean_wounds: self.wounds as f64 / n,
            histogram: self.histogram,
        }
    }
}

/// Runs repeated resolutions of one scenario.
#[derive(Clone, Debug, Default)]
pub struct Simulator {
    config: SimulationConfig,
    engine: EngineConfig,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            engine: EngineConfig::default(),
        }
    }

    #[must_use]
    pub fn with_engine_config(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs every trial on the calling thread.
    pub fn run(&self, scenario: &LoadedScenario) -> Result<SimulationReport> {
        if self.config.trials == 0 {
            return Err(RuntimeError::NoTrials);
        }
        let plan = self.plan();
        let mut tally = Tally::default();
        for (shard, trials) in plan.into_iter().enumerate() {
            tally.merge(run_shard(scenario, &self.engine, self.shard_seed(shard), trials)?);
        }
        Ok(self.finish(tally))
    }

    /// Runs shards concurrently on tokio's blocking pool.
    ///
    /// Produces the same report as [`Self::run`] for the same config.
    pub async fn run_sharded(&self, scenario: Arc<LoadedScenario>) -> Result<SimulationReport> {
        if self.config.trials == 0 {
            return Err(RuntimeError::NoTrials);
        }

        let mut handles = Vec::new();
        for (shard, trials) in self.plan().into_iter().enumerate() {
            let scenario = Arc::clone(&scenario);
            let engine = self.engine.clone();
            let seed = self.shard_seed(shard);
            handles.push(tokio::task::spawn_blocking(move || {
                run_shard(&scenario, &engine, seed, trials)
            }));
        }

        let mut tally = Tally::default();
        for handle in handles {
            let shard = handle.await.map_err(RuntimeError::WorkerJoin)??;
            tally.merge(shard);
        }
        Ok(self.finish(tally))
    }

    /// Trials per shard; earlier shards take the remainder.
    fn plan(&self) -> Vec<u32> {
        let shards = self.config.shards.clamp(1, self.config.trials as usize) as u32;
        let base = self.config.trials / shards;
        let extra = self.config.trials % shards;
        (0..shards).map(|i| base + u32::from(i < extra)).collect()
    }

    fn shard_seed(&self, shard: usize) -> u64 {
        mix_seed(self.config.seed, shard as u64)
    }

    fn finish(&self, tally: Tally) -> SimulationReport {
        let report = tally.into_report();
        tracing::info!(
            trials = report.trials,
            shards = self.config.shards.max(1),
            mean_damage = report.mean_damage,
            "simulation finished"
        );
        report
    }
}

fn run_shard(
    scenario: &LoadedScenario,
    engine: &EngineConfig,
    seed: u64,
    trials: u32,
) -> Result<Tally> {
    let mut dice = RandDice::seeded(seed);
    let mut tally = Tally::default();
    for _ in 0..trials {
        tally.record(&resolve_once(scenario, engine, &mut dice)?);
    }
    tracing::debug!(seed, trials, "simulation shard finished");
    Ok(tally)
}

fn resolve_once(
    scenario: &LoadedScenario,
    engine: &EngineConfig,
    dice: &mut dyn DiceSource,
) -> Result<CombatSummary> {
    let engagement = scenario.engagement()?;
    let outcome = engagement.resolve_with_config(dice, engine)?;
    Ok(outcome.result.summary)
}
