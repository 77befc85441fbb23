//! Deterministic rule evaluation and combat resolution for a tabletop wargame.
//!
//! `wargame-core` interprets structured abilities ([`rule::Rule`]) against a
//! battle context, merges their effects into provenance-tagged modifiers, and
//! resolves the attack/hit/wound/save/feel-no-pain sequence into an auditable
//! [`CombatResult`]. It performs no I/O: content, persistence and presentation
//! live in the crates that depend on it.
//!
//! The two entry points are [`select_applicable_rules`] and [`resolve_combat`];
//! [`Engagement`] wires both together for one weapon/target pairing.
pub mod combat;
pub mod config;
pub mod dice;
pub mod engagement;
pub mod error;
pub mod eval;
pub mod modifiers;
pub mod rule;
pub mod state;

pub use combat::{
    CombatModifiers, CombatOptions, CombatResult, CombatSummary, DieRoll, EffectiveTarget,
    EffectiveWeapon, RollFlags, SaveKind, Step, StepNote, StepRecord, resolve_combat,
    resolve_combat_with_config,
};
pub use config::EngineConfig;
pub use dice::{DiceError, DiceExpr, DiceSource, FixedDice, PcgDice, ScriptedDice, mix_seed};
pub use engagement::{Engagement, EngagementBuilder, EngagementOutcome, EngagementSelection};
pub use error::{EngineError, ErrorSeverity, ResolveError};
pub use eval::{
    ChoiceMap, CombatContext, Diagnostic, DiagnosticKind, Selection, Side, SkipReason, evaluate,
    select_applicable_rules,
};
pub use modifiers::{ModifierAccumulator, ModifierEntry, ModifierKey};
pub use rule::{
    ActivationLimit, Atom, Block, ChoiceLifetime, ChoiceOption, Condition, Effect, Phase, Rule,
    RuleBody, RuleId, Scope, Subject, Trigger, TurnFilter,
};
pub use state::{
    ArmyFact, ArmyState, ChoiceSelection, Seat, TargetProfile, TurnKey, Unit, UnitId, UnitStatus,
    WeaponProfile, WeaponRange,
};
