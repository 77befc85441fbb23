//! Subcommands.

mod explain;
mod resolve;
mod simulate;
mod validate;

pub use explain::Explain;
pub use resolve::Resolve;
pub use simulate::Simulate;
pub use validate::Validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use wargame_content::{ContentFactory, LoadedScenario, ScenarioLoader};
use wargame_core::{CombatOptions, EngineConfig, RuleId};

/// Where content comes from.
#[derive(Args, Clone, Debug)]
pub struct ContentArgs {
    /// Data directory holding `rules.json` and `scenarios/`
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl ContentArgs {
    pub fn factory(&self) -> ContentFactory {
        ContentFactory::new(&self.data_dir)
    }
}

/// A scenario by name (looked up under `scenarios/`) or by path.
#[derive(Args, Clone, Debug)]
pub struct ScenarioArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Scenario name or path to a scenario file
    #[arg(value_name = "SCENARIO")]
    pub scenario: String,

    /// Choice for this resolution, as `rule=option` (repeatable)
    #[arg(short, long = "choice", value_name = "RULE=OPTION", value_parser = parse_choice)]
    pub choices: Vec<(RuleId, String)>,
}

impl ScenarioArgs {
    pub fn load(&self) -> Result<(LoadedScenario, EngineConfig)> {
        let factory = self.content.factory();
        let config = factory.load_config()?;
        let catalog = factory
            .load_catalog()
            .with_context(|| format!("loading catalog from {}", factory.data_dir().display()))?;

        let path = Path::new(&self.scenario);
        let loaded = if path.extension().is_some() && path.exists() {
            ScenarioLoader::load_with(path, &catalog)?
        } else {
            factory.load_scenario(&self.scenario, &catalog)?
        };
        Ok((loaded, config))
    }

    /// Scenario options with command-line choices layered on top.
    pub fn options(&self, loaded: &LoadedScenario) -> CombatOptions {
        let mut options = loaded.scenario.options.clone();
        for (rule, option) in &self.choices {
            options.choices.insert(rule.clone(), option.clone());
        }
        options
    }
}

fn parse_choice(raw: &str) -> Result<(RuleId, String), String> {
    match raw.split_once('=') {
        Some((rule, option)) if !rule.is_empty() && !option.is_empty() => {
            Ok((RuleId::new(rule.trim()), option.trim().to_string()))
        }
        _ => Err(format!("expected RULE=OPTION, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_parse_as_pairs() {
        assert_eq!(
            parse_choice("combat-doctrines=tactical").unwrap(),
            (RuleId::new("combat-doctrines"), "tactical".to_string())
        );
        assert!(parse_choice("tactical").is_err());
        assert!(parse_choice("=tactical").is_err());
    }
}
