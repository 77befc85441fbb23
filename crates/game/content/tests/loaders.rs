use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wargame_content::{
    CatalogLoader, ContentError, ContentFactory, IssueKind, RuleCatalog, ScenarioLoader,
    validate_rules,
};
use wargame_core::rule::{Atom, Block, Effect, RerollKind, RollPhase, RuleBody, Subject};
use wargame_core::state::UnitStatus;
use wargame_core::{Condition, EngineConfig, FixedDice, RuleId, SaveKind, Step, StepNote};

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ================================================================
// Bundled data
// ================================================================

#[test]
fn bundled_catalog_is_well_formed() {
    let factory = ContentFactory::new(data_dir());
    let config = factory.load_config().unwrap();
    let catalog = factory.load_catalog().unwrap();

    assert!(!catalog.is_empty());
    let issues = validate_rules(catalog.iter(), &config);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn bundled_scenarios_build_engagements() {
    let factory = ContentFactory::new(data_dir());
    let catalog = factory.load_catalog().unwrap();

    for name in ["intercessors_vs_warriors", "lascannon_vs_tank"] {
        let loaded = factory.load_scenario(name, &catalog).unwrap();
        assert_eq!(
            loaded.attacker_rules.len(),
            loaded.scenario.attacker_rules.len()
        );
        loaded.engagement().unwrap();
    }
}

#[test]
fn intercessor_scenario_selects_its_rules() {
    let factory = ContentFactory::new(data_dir());
    let catalog = factory.load_catalog().unwrap();
    let loaded = factory
        .load_scenario("intercessors_vs_warriors", &catalog)
        .unwrap();
    let selection = loaded.engagement().unwrap().select();

    assert!(selection.attacker.was_applied("oath-of-moment"));
    assert!(selection.attacker.was_applied("bolter-discipline"));
    let doctrine = selection
        .attacker
        .applied
        .iter()
        .find(|a| a.id.as_str() == "combat-doctrines")
        .unwrap();
    assert_eq!(doctrine.option.as_deref(), Some("devastator"));

    assert!(selection.defender.was_applied("reanimation-protocols"));
    assert!(selection.defender.was_applied("living-metal-shroud"));
    assert!(selection.attacker.diagnostics.is_empty());
}

#[test]
fn lascannon_scenario_resolves_deterministically() {
    let factory = ContentFactory::new(data_dir());
    let catalog = factory.load_catalog().unwrap();
    let loaded = factory.load_scenario("lascannon_vs_tank", &catalog).unwrap();
    let outcome = loaded
        .engagement()
        .unwrap()
        .resolve(&mut FixedDice(4))
        .unwrap();

    let summary = &outcome.result.summary;
    assert_eq!(summary.attacks, 2);
    assert_eq!(summary.hits, 2);
    assert_eq!(summary.critical_wounds, 2);
    assert_eq!(summary.final_damage, 0);

    let save = outcome.result.step(Step::Save).unwrap();
    assert_eq!(save.threshold, Some(4));
    assert!(save.notes.contains(&StepNote::SaveUsed {
        kind: SaveKind::Invulnerable
    }));
}

// ================================================================
// Loader behaviour
// ================================================================

#[test]
fn unknown_nodes_load_as_unrecognized() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rules.json",
        r#"{ "rules": [{
            "id": "future",
            "name": "From a later edition",
            "when": { "atom": { "atom": "objective_controlled", "objective": 3 } },
            "body": { "kind": "passive", "blocks": [{ "do": [{ "effect": "teleport" }] }] }
        }] }"#,
    );

    let catalog = CatalogLoader::load(&path).unwrap();
    let rule = catalog.get(&RuleId::new("future")).unwrap();
    assert_eq!(rule.when, Condition::Atom(Atom::Unrecognized));
    let RuleBody::Passive { blocks } = &rule.body else {
        panic!("expected a passive rule");
    };
    assert_eq!(blocks[0], Block::effects([Effect::Unrecognized]));

    let kinds: Vec<_> = validate_rules(catalog.iter(), &EngineConfig::default())
        .into_iter()
        .map(|i| i.kind)
        .collect();
    assert_eq!(kinds, [IssueKind::UnrecognizedAtom, IssueKind::UnrecognizedEffect]);
}

#[test]
fn unknown_combinators_and_blocks_only_disable_their_node() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "rules.json",
        r#"{ "rules": [
            {
                "id": "oath",
                "name": "Oath of Moment",
                "body": { "kind": "passive", "blocks": [
                    { "do": [{ "effect": "hit_modifier", "value": 1 }] }
                ] }
            },
            {
                "id": "looping",
                "name": "Looping",
                "body": { "kind": "passive", "blocks": [
                    { "repeat": { "times": 2, "blocks": [] } },
                    { "do": [{ "effect": "wound_modifier", "value": 1 }] }
                ] }
            },
            {
                "id": "exclusive",
                "name": "Exclusive",
                "when": { "xor": [] },
                "body": { "kind": "passive", "blocks": [] }
            }
        ] }"#,
    );

    let catalog = CatalogLoader::load(&path).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(
        catalog.get(&RuleId::new("oath")).unwrap().body,
        RuleBody::Passive {
            blocks: vec![Block::effects([Effect::HitModifier { value: 1 }])]
        }
    );
    let RuleBody::Passive { blocks } = &catalog.get(&RuleId::new("looping")).unwrap().body else {
        panic!("expected a passive rule");
    };
    assert_eq!(blocks[0], Block::Unrecognized);
    assert_eq!(blocks[1], Block::effects([Effect::WoundModifier { value: 1 }]));
    assert_eq!(
        catalog.get(&RuleId::new("exclusive")).unwrap().when,
        Condition::Unrecognized
    );

    let issues: Vec<_> = validate_rules(catalog.iter(), &EngineConfig::default())
        .into_iter()
        .map(|i| (i.rule.to_string(), i.path, i.kind))
        .collect();
    assert_eq!(
        issues,
        [
            (
                "looping".to_string(),
                "body.blocks[0]".to_string(),
                IssueKind::UnrecognizedBlock
            ),
            (
                "exclusive".to_string(),
                "when".to_string(),
                IssueKind::UnrecognizedCondition
            ),
        ]
    );
}

#[test]
fn ron_catalogs_match_their_json_equivalent() {
    let dir = TempDir::new().unwrap();
    let json = write(
        &dir,
        "rules.json",
        r#"{ "rules": [
            {
                "id": "tank-hunters",
                "name": "Tank Hunters",
                "when": { "atom": { "atom": "weapon_keyword", "keyword": "melta" } },
                "body": { "kind": "passive", "blocks": [
                    { "if": {
                        "condition": { "all": [
                            { "atom": { "atom": "target_keyword", "keyword": "vehicle" } },
                            { "not": { "atom": {
                                "atom": "unit_status", "subject": "own", "status": "advanced"
                            } } }
                        ] },
                        "then": [{ "do": [
                            { "effect": "wound_modifier", "value": 1 },
                            { "effect": "reroll", "phase": "wound", "kind": "ones" }
                        ] }]
                    } }
                ] }
            },
            {
                "id": "doctrines",
                "name": "Combat Doctrines",
                "body": { "kind": "choice", "lifetime": "per_turn", "options": [
                    { "value": "devastator", "blocks": [{ "do": [
                        { "effect": "weapon_stat", "stat": "armour_penetration", "value": 1 }
                    ] }] }
                ] }
            },
            {
                "id": "deep-strike",
                "name": "Deep Strike",
                "body": { "kind": "reminder", "text": "Arrive from reserves." }
            }
        ] }"#,
    );
    let ron = write(
        &dir,
        "rules.ron",
        r#"(rules: [
            (
                id: "tank-hunters",
                name: "Tank Hunters",
                when: { "atom": { "atom": "weapon_keyword", "keyword": "melta" } },
                body: { "kind": "passive", "blocks": [
                    { "if": {
                        "condition": { "all": [
                            { "atom": { "atom": "target_keyword", "keyword": "vehicle" } },
                            { "not": { "atom": {
                                "atom": "unit_status", "subject": "own", "status": "advanced",
                            } } },
                        ] },
                        "then": [{ "do": [
                            { "effect": "wound_modifier", "value": 1 },
                            { "effect": "reroll", "phase": "wound", "kind": "ones" },
                        ] }],
                    } },
                ] },
            ),
            (
                id: "doctrines",
                name: "Combat Doctrines",
                body: { "kind": "choice", "lifetime": "per_turn", "options": [
                    { "value": "devastator", "blocks": [{ "do": [
                        { "effect": "weapon_stat", "stat": "armour_penetration", "value": 1 },
                    ] }] },
                ] },
            ),
            (
                id: "deep-strike",
                name: "Deep Strike",
                body: { "kind": "reminder", "text": "Arrive from reserves." },
            ),
        ])"#,
    );

    let from_json = CatalogLoader::load(&json).unwrap();
    let from_ron = CatalogLoader::load(&ron).unwrap();
    assert_eq!(from_ron, from_json);

    let rule = from_ron.get(&RuleId::new("tank-hunters")).unwrap();
    assert_eq!(rule.when, Condition::weapon_keyword("melta"));
    let RuleBody::Passive { blocks } = &rule.body else {
        panic!("expected a passive rule");
    };
    let Block::If { condition, then } = &blocks[0] else {
        panic!("expected a conditional block");
    };
    assert_eq!(
        *condition,
        Condition::all([
            Condition::target_keyword("vehicle"),
            Condition::not(Condition::status(Subject::Own, UnitStatus::Advanced)),
        ])
    );
    assert_eq!(
        then[0],
        Block::effects([
            Effect::WoundModifier { value: 1 },
            Effect::Reroll {
                phase: RollPhase::Wound,
                kind: RerollKind::Ones
            },
        ])
    );
    assert!(validate_rules(from_ron.iter(), &EngineConfig::default()).is_empty());
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "rules.yaml", "rules: []");
    let err = CatalogLoader::load(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ContentError>(),
        Some(ContentError::UnsupportedFormat(_))
    ));
}

#[test]
fn scenario_with_unknown_rule_fails() {
    let dir = TempDir::new().unwrap();
    let scenario = fs::read_to_string(data_dir().join("scenarios/lascannon_vs_tank.json")).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&scenario).unwrap();
    value["attacker_rules"] = serde_json::json!(["no-such-rule"]);
    let path = write(&dir, "scenario.json", &value.to_string());

    let err = ScenarioLoader::load_with(&path, &RuleCatalog::default()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<ContentError>(),
        Some(&ContentError::UnknownRule(RuleId::new("no-such-rule")))
    );
}

#[test]
fn missing_config_falls_back_to_standard_tables() {
    let dir = TempDir::new().unwrap();
    let factory = ContentFactory::new(dir.path());
    assert_eq!(factory.load_config().unwrap(), EngineConfig::default());
}
