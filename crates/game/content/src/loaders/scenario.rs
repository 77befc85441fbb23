//! Scenario loader.
//!
//! A scenario names both units, the weapon, and the rule ids each side brings,
//! and carries whatever persistent army state and situational options apply.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wargame_core::rule::Phase;
use wargame_core::{
    ArmyState, CombatOptions, Engagement, ResolveError, Rule, RuleId, TurnKey, Unit,
    WeaponProfile,
};

use crate::loaders::{LoadResult, RuleCatalog, read_data};

/// One attack setup, as authored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub attacker: Unit,
    pub defender: Unit,
    pub weapon: WeaponProfile,
    /// Defaults to shooting for ranged weapons, fight for melee.
    #[serde(default)]
    pub phase: Option<Phase>,
    /// Defaults to the attacker's first turn.
    #[serde(default)]
    pub turn: Option<TurnKey>,
    #[serde(default)]
    pub attacker_rules: Vec<RuleId>,
    #[serde(default)]
    pub defender_rules: Vec<RuleId>,
    #[serde(default)]
    pub options: CombatOptions,
    #[serde(default)]
    pub attacker_army: ArmyState,
    #[serde(default)]
    pub defender_army: ArmyState,
}

/// A scenario with its rule ids looked up in a catalog.
#[derive(Clone, Debug)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub attacker_rules: Vec<Rule>,
    pub defender_rules: Vec<Rule>,
}

impl LoadedScenario {
    pub fn resolve_rules(scenario: Scenario, catalog: &RuleCatalog) -> LoadResult<Self> {
        let attacker_rules = catalog.select(&scenario.attacker_rules)?;
        let defender_rules = catalog.select(&scenario.defender_rules)?;
        Ok(Self {
            scenario,
            attacker_rules,
            defender_rules,
        })
    }

    /// Builds the engagement this scenario describes.
    pub fn engagement(&self) -> Result<Engagement<'_>, ResolveError> {
        self.engagement_with(self.scenario.options.clone())
    }

    /// Same as [`Self::engagement`] with the situational options replaced.
    pub fn engagement_with(&self, options: CombatOptions) -> Result<Engagement<'_>, ResolveError> {
        let s = &self.scenario;
        let mut builder = Engagement::builder()
            .attacker(&s.attacker)
            .defender(&s.defender)
            .weapon(&s.weapon)
            .armies(&s.attacker_army, &s.defender_army)
            .attacker_rules(&self.attacker_rules)
            .defender_rules(&self.defender_rules)
            .options(options);
        if let Some(phase) = s.phase {
            builder = builder.phase(phase);
        }
        if let Some(turn) = s.turn {
            builder = builder.turn(turn);
        }
        builder.build()
    }
}

/// Loader for scenarios from JSON or RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        read_data(path, "scenario")
    }

    /// Load a scenario and look up its rules in `catalog`.
    pub fn load_with(path: &Path, catalog: &RuleCatalog) -> LoadResult<LoadedScenario> {
        let scenario = Self::load(path)?;
        tracing::debug!(
            scenario = %scenario.name,
            attacker_rules = scenario.attacker_rules.len(),
            defender_rules = scenario.defender_rules.len(),
            "loaded scenario"
        );
        LoadedScenario::resolve_rules(scenario, catalog)
    }
}
