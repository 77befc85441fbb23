use wargame_core::modifiers::ModifierKey;
use wargame_core::rule::{
    ActivationLimit, Block, ChoiceOption, Effect, Phase, RerollKind, RollPhase, Subject, Trigger,
    TurnFilter, UnitAbility, WeaponAbility,
};
use wargame_core::state::ChoiceSelection;
use wargame_core::{
    ArmyFact, ArmyState, Atom, ChoiceLifetime, CombatOptions, Condition, DiagnosticKind, DiceExpr,
    Engagement, FixedDice, ResolveError, Rule, RuleId, Seat, Side, SkipReason, Step, TurnKey,
    Unit, UnitStatus, WeaponProfile,
};

const TURN: TurnKey = TurnKey::new(2, Seat::First);
static EMPTY_ARMY: ArmyState = ArmyState::EMPTY;

fn attacker() -> Unit {
    Unit::new("hellblasters", Seat::First, 5, 4, 3).with_keywords(["Infantry"])
}

fn defender() -> Unit {
    Unit::new("warriors", Seat::Second, 10, 4, 4).with_keywords(["Infantry", "Necrons"])
}

fn rifle() -> WeaponProfile {
    WeaponProfile::ranged("plasma incinerator", 24, DiceExpr::fixed(2), 3, 7, 2, DiceExpr::fixed(1))
        .with_keywords(["Plasma"])
}

fn plus_one_to_hit(id: &str) -> Rule {
    Rule::passive(id, id, [Block::effects([Effect::HitModifier { value: 1 }])])
}

// ================================================================
// Trigger filtering
// ================================================================

#[test]
fn trigger_filters_reject_before_the_condition() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![
        plus_one_to_hit("shooting-only").with_trigger(Trigger::in_phases([Phase::Shooting])),
        plus_one_to_hit("fight-only").with_trigger(Trigger::in_phases([Phase::Fight])),
        plus_one_to_hit("opponent-turn")
            .with_trigger(Trigger::any().with_turn(TurnFilter::Opponent)),
        plus_one_to_hit("never").with_condition(Condition::False),
    ];
    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");

    let selection = engagement.select();
    let attacker = &selection.attacker;
    assert!(attacker.was_applied("shooting-only"));
    assert_eq!(attacker.skip_reason("fight-only"), Some(SkipReason::Phase));
    assert_eq!(attacker.skip_reason("opponent-turn"), Some(SkipReason::Turn));
    assert_eq!(attacker.skip_reason("never"), Some(SkipReason::ConditionFalse));
    assert_eq!(attacker.modifiers.get(&ModifierKey::Hit), 1);
}

#[test]
fn exhausted_rules_are_skipped() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![
        plus_one_to_hit("once")
            .with_trigger(Trigger::any().with_limit(ActivationLimit::OncePerBattle)),
    ];
    let mut army = ArmyState::new();
    army.activations.record(RuleId::new("once"), TurnKey::new(1, Seat::First));

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .armies(&army, &EMPTY_ARMY)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");

    let selection = engagement.select();
    assert_eq!(selection.attacker.skip_reason("once"), Some(SkipReason::LimitReached));
}

// ================================================================
// Side independence
// ================================================================

#[test]
fn defensive_rules_never_leak_into_the_attacker_pass() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let reanimation = Rule::passive(
        "reanimation",
        "Reanimation Protocols",
        [Block::effects([
            Effect::FeelNoPain { threshold: 5 },
            Effect::IncomingHitModifier { value: -1 },
            // Offensive effect on the defender's own rule: ignored while defending.
            Effect::HitModifier { value: 1 },
        ])],
    );
    let attacker_rules = vec![Rule::passive(
        "storm",
        "Storm Shield",
        [Block::effects([Effect::InvulnerableSave { threshold: 4 }])],
    )];
    let defender_rules = vec![reanimation];

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&attacker_rules)
        .defender_rules(&defender_rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    assert!(!selection.attacker.modifiers.has(&ModifierKey::InvulnerableSave));
    assert!(!selection.attacker.modifiers.has(&ModifierKey::FeelNoPain));
    assert_eq!(selection.defender.modifiers.extremum(&ModifierKey::FeelNoPain), Some(5));
    assert_eq!(selection.defender.modifiers.get(&ModifierKey::IncomingHit), -1);
    assert!(!selection.defender.modifiers.has(&ModifierKey::Hit));
}

#[test]
fn army_state_atoms_read_only_their_own_side() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rule = |id: &str| plus_one_to_hit(id).with_condition(Condition::army_state("doctrine"));
    let attacker_rules = vec![rule("attacker-doctrine")];
    let defender_rules = vec![Rule::passive(
        "defender-doctrine",
        "Defender Doctrine",
        [Block::effects([Effect::IncomingWoundModifier { value: -1 }])],
    )
    .with_condition(Condition::army_state("doctrine"))];

    let attacker_army = ArmyState::new();
    let defender_army = ArmyState::new().with_fact(ArmyFact::new("doctrine"));

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .armies(&attacker_army, &defender_army)
        .attacker_rules(&attacker_rules)
        .defender_rules(&defender_rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    assert_eq!(
        selection.attacker.skip_reason("attacker-doctrine"),
        Some(SkipReason::ConditionFalse)
    );
    assert!(selection.defender.was_applied("defender-doctrine"));
}

// ================================================================
// Blocks and choices
// ================================================================

#[test]
fn nested_blocks_apply_only_when_their_condition_holds() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![Rule::passive(
        "hunters",
        "Hunters",
        [
            Block::effects([Effect::WoundModifier { value: 1 }]),
            Block::when(
                Condition::target_keyword("vehicle"),
                [Block::effects([Effect::GrantWeaponAbility {
                    ability: WeaponAbility::LethalHits,
                }])],
            ),
            Block::when(
                Condition::target_keyword("necrons"),
                [Block::effects([Effect::Reroll {
                    phase: RollPhase::Hit,
                    kind: RerollKind::Ones,
                }])],
            ),
        ],
    )];

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    let mods = &selection.attacker.modifiers;
    assert_eq!(mods.get(&ModifierKey::Wound), 1);
    assert_eq!(mods.reroll(RollPhase::Hit), Some(RerollKind::Ones));
    assert!(mods.entries(&ModifierKey::Wound)[0].source == RuleId::new("hunters"));
    assert_eq!(selection.attacker.applied[0].effects, 2);
}

fn doctrine_choice() -> Rule {
    Rule::choice(
        "doctrine",
        "Combat Doctrine",
        ChoiceLifetime::PerTurn,
        [
            ChoiceOption::new(
                "devastator",
                [Block::effects([Effect::WeaponStat {
                    stat: wargame_core::rule::WeaponStat::ArmourPenetration,
                    value: 1,
                }])],
            ),
            ChoiceOption::new(
                "tactical",
                [Block::effects([Effect::HitModifier { value: 1 }])],
            ),
        ],
    )
}

#[test]
fn unselected_choice_is_displayed_but_not_applied() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![doctrine_choice()];
    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    assert_eq!(selection.attacker.displayable_choices.len(), 1);
    assert_eq!(selection.attacker.displayable_choices[0].options, ["devastator", "tactical"]);
    assert_eq!(selection.attacker.skip_reason("doctrine"), Some(SkipReason::AwaitingChoice));
    assert!(selection.attacker.modifiers.is_empty());
}

#[test]
fn persisted_and_per_roll_choices() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![doctrine_choice()];
    let mut army = ArmyState::new();
    army.choices
        .record(ChoiceSelection::new("doctrine", "devastator", TURN));

    let build = |options: CombatOptions| {
        Engagement::builder()
            .attacker(&a)
            .defender(&d)
            .weapon(&w)
            .turn(TURN)
            .armies(&army, &EMPTY_ARMY)
            .attacker_rules(&rules)
            .options(options)
            .build()
            .expect("engagement builds")
    };

    let persisted = build(CombatOptions::default()).select();
    assert_eq!(persisted.attacker.applied[0].option.as_deref(), Some("devastator"));

    let mut options = CombatOptions::default();
    options.choices.insert(RuleId::new("doctrine"), "tactical".into());
    let overridden = build(options).select();
    assert_eq!(overridden.attacker.applied[0].option.as_deref(), Some("tactical"));
    assert_eq!(overridden.attacker.modifiers.get(&ModifierKey::Hit), 1);

    let mut options = CombatOptions::default();
    options.choices.insert(RuleId::new("doctrine"), "assault".into());
    let unknown = build(options).select();
    assert_eq!(unknown.attacker.skip_reason("doctrine"), Some(SkipReason::UnknownOption));
    assert!(matches!(
        unknown.attacker.diagnostics[0].kind,
        DiagnosticKind::UnknownOption { .. }
    ));
}

#[test]
fn reminders_are_surfaced() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![Rule::reminder("deep-strike", "Deep Strike", "Set up in reserves")];
    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();
    assert_eq!(selection.attacker.reminders.len(), 1);
    assert!(selection.attacker.applied.is_empty());
}

// ================================================================
// Malformed content
// ================================================================

#[test]
fn malformed_rule_is_reported_without_blocking_others() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let rules = vec![
        plus_one_to_hit("broken").with_condition(Condition::all([
            Condition::True,
            Condition::Atom(Atom::Unrecognized),
        ])),
        Rule::passive(
            "half-broken",
            "Half Broken",
            [
                Block::effects([Effect::Unrecognized, Effect::WoundModifier { value: 1 }]),
                Block::Unrecognized,
            ],
        ),
        plus_one_to_hit("fine"),
    ];
    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    assert_eq!(selection.attacker.skip_reason("broken"), Some(SkipReason::ConditionFalse));
    assert!(selection.attacker.was_applied("half-broken"));
    assert!(selection.attacker.was_applied("fine"));
    assert_eq!(selection.attacker.diagnostics.len(), 3);
    assert!(
        selection
            .attacker
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnrecognizedBlock)
    );
    assert_eq!(selection.attacker.modifiers.get(&ModifierKey::Wound), 1);
}

// ================================================================
// Engagement
// ================================================================

#[test]
fn missing_participants_are_rejected() {
    let (a, d) = (attacker(), defender());
    let err = Engagement::builder().attacker(&a).defender(&d).build().unwrap_err();
    assert_eq!(err, ResolveError::MissingWeapon);

    let w = rifle();
    let err = Engagement::builder().attacker(&a).weapon(&w).build().unwrap_err();
    assert_eq!(err, ResolveError::MissingTarget);
}

#[test]
fn charge_status_feeds_lance() {
    let mut a = attacker();
    a.mark(UnitStatus::Charged, TURN).expect("status fits");
    let d = defender();
    let lance = WeaponProfile::melee("lance", DiceExpr::fixed(3), 3, 4, 0, DiceExpr::fixed(1))
        .with_ability(WeaponAbility::Lance);
    let rules = vec![
        plus_one_to_hit("charged-bonus")
            .with_condition(Condition::status(Subject::Own, UnitStatus::Charged)),
    ];

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&lance)
        .turn(TURN)
        .attacker_rules(&rules)
        .build()
        .expect("engagement builds");
    assert_eq!(engagement.phase, Phase::Fight);
    assert!(engagement.effective_options().charged);

    let outcome = engagement.resolve(&mut FixedDice(3)).expect("resolves");
    assert!(outcome.selection.attacker.was_applied("charged-bonus"));
    let wound = outcome.result.step(Step::Wound).expect("wound step");
    assert_eq!(wound.threshold, Some(3));
    assert_eq!(outcome.result.summary.wounds, 3);
}

#[test]
fn granted_abilities_reach_the_resolution() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let attacker_rules = vec![Rule::passive(
        "hazard",
        "Overcharge",
        [Block::effects([Effect::GrantWeaponAbility {
            ability: WeaponAbility::SustainedHits { hits: 1 },
        }])],
    )];
    let defender_rules = vec![Rule::passive(
        "veil",
        "Veil",
        [Block::effects([Effect::GrantUnitAbility {
            ability: UnitAbility::Stealth,
        }])],
    )];
    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&attacker_rules)
        .defender_rules(&defender_rules)
        .build()
        .expect("engagement builds");

    let outcome = engagement.resolve(&mut FixedDice(6)).expect("resolves");
    assert_eq!(outcome.result.weapon.sustained_hits, 1);
    let hit = outcome.result.step(Step::Hit).expect("hit step");
    assert_eq!(hit.threshold, Some(4));
    assert_eq!(outcome.result.summary.sustained_hits, 2);

    assert!(engagement.limited_activations(&outcome.selection).is_empty());
}

#[test]
fn limited_rules_are_reported_for_the_ledger() {
    let (a, d, w) = (attacker(), defender(), rifle());
    let attacker_rules = vec![
        plus_one_to_hit("oath")
            .with_trigger(Trigger::any().with_limit(ActivationLimit::OncePerTurn)),
        plus_one_to_hit("always"),
    ];
    let defender_rules = vec![Rule::passive(
        "shroud",
        "Shroud",
        [Block::effects([Effect::IncomingHitModifier { value: -1 }])],
    )
    .with_trigger(Trigger::any().with_limit(ActivationLimit::OncePerBattle))];

    let engagement = Engagement::builder()
        .attacker(&a)
        .defender(&d)
        .weapon(&w)
        .turn(TURN)
        .attacker_rules(&attacker_rules)
        .defender_rules(&defender_rules)
        .build()
        .expect("engagement builds");
    let selection = engagement.select();

    let limited = engagement.limited_activations(&selection);
    assert_eq!(
        limited,
        vec![
            (Side::Attacker, RuleId::new("oath")),
            (Side::Defender, RuleId::new("shroud")),
        ]
    );
}
