use std::sync::Arc;

use wargame_content::{LoadedScenario, Scenario};
use wargame_core::rule::{Block, Effect, RerollKind, RollPhase};
use wargame_core::{
    ArmyState, CombatOptions, DiceExpr, ResolveError, Rule, RuleId, Seat, Unit, WeaponProfile,
};
use wargame_runtime::{RuntimeError, SimulationConfig, Simulator};

fn scenario(defender_models: u16) -> LoadedScenario {
    let rules = vec![Rule::passive(
        "reroll-hits",
        "Re-roll hits",
        [Block::effects([Effect::Reroll {
            phase: RollPhase::Hit,
            kind: RerollKind::Failed,
        }])],
    )];
    LoadedScenario {
        scenario: Scenario {
            name: "bolters".into(),
            attacker: Unit::new("intercessors", Seat::First, 5, 4, 3),
            defender: Unit::new("warriors", Seat::Second, defender_models, 4, 4),
            weapon: WeaponProfile::ranged(
                "bolt rifle",
                24,
                DiceExpr::fixed(2),
                3,
                4,
                1,
                DiceExpr::fixed(1),
            ),
            phase: None,
            turn: None,
            attacker_rules: vec![RuleId::new("reroll-hits")],
            defender_rules: Vec::new(),
            options: CombatOptions::new(5),
            attacker_army: ArmyState::new(),
            defender_army: ArmyState::new(),
        },
        attacker_rules: rules,
        defender_rules: Vec::new(),
    }
}

fn config(shards: usize) -> SimulationConfig {
    SimulationConfig {
        trials: 400,
        seed: 2024,
        shards,
    }
}

#[test]
fn report_is_consistent() {
    let report = Simulator::new(config(1)).run(&scenario(10)).unwrap();

    assert_eq!(report.trials, 400);
    assert_eq!(report.histogram.values().sum::<u32>(), 400);
    assert!(report.min_damage as f64 <= report.mean_damage);
    assert!(report.mean_damage <= report.max_damage as f64);
    // Ten shots can never deal more than ten damage.
    assert!(report.max_damage <= 10);
    assert!(report.mean_hits >= report.mean_wounds);
    assert!(report.mean_hits > 0.0);
}

#[test]
fn same_seed_same_report() {
    let a = Simulator::new(config(3)).run(&scenario(10)).unwrap();
    let b = Simulator::new(config(3)).run(&scenario(10)).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn sharded_run_matches_sequential_run() {
    let scenario = Arc::new(scenario(10));
    let simulator = Simulator::new(config(4));
    let sequential = simulator.run(&scenario).unwrap();
    let sharded = simulator.run_sharded(Arc::clone(&scenario)).await.unwrap();
    assert_eq!(sequential, sharded);
}

#[tokio::test]
async fn resolution_errors_surface() {
    let simulator = Simulator::new(config(2));
    let err = simulator.run_sharded(Arc::new(scenario(0))).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Resolve(ResolveError::EmptyTarget(_))
    ));

    let none = Simulator::new(SimulationConfig {
        trials: 0,
        ..config(1)
    });
    assert!(matches!(none.run(&scenario(10)), Err(RuntimeError::NoTrials)));
}
