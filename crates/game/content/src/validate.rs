//! Structural checks for rule content.
//!
//! The engine evaluates whatever it is given and fails closed on malformed
//! nodes. Catalog authors want to hear about those nodes before a game, so this
//! module walks each rule and reports every structural problem with a path to
//! the offending node.

use std::collections::HashSet;
use std::fmt;

use wargame_core::EngineConfig;
use wargame_core::rule::{
    Atom, Block, Condition, Effect, Rule, RuleBody, RuleId, UnitAbility, WeaponAbility,
};

/// What is wrong with a node.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IssueKind {
    #[error("`all` with no children")]
    EmptyAll,

    #[error("`any` with no children")]
    EmptyAny,

    #[error("unrecognized condition node")]
    UnrecognizedCondition,

    #[error("unrecognized condition atom")]
    UnrecognizedAtom,

    #[error("unrecognized block")]
    UnrecognizedBlock,

    #[error("unrecognized effect")]
    UnrecognizedEffect,

    #[error("unrecognized ability")]
    UnrecognizedAbility,

    #[error("choice rule with no options")]
    EmptyChoice,

    #[error("choice option `{0}` appears more than once")]
    DuplicateOption(String),

    #[error("{field} threshold {value}+ is outside {min}+..={max}+")]
    ThresholdOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("rule id is empty")]
    EmptyId,

    #[error("rule id appears more than once in the catalog")]
    DuplicateId,
}

/// One problem found in a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub rule: RuleId,
    /// Dotted path from the rule root, e.g. `body.blocks[1].then[0]`.
    pub path: String,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.rule, self.path, self.kind)
    }
}

/// Reports every structural issue in `rule`. An empty result means the rule is
/// well-formed.
pub fn validate_rule(rule: &Rule, config: &EngineConfig) -> Vec<ValidationIssue> {
    let mut walker = Walker {
        rule: &rule.id,
        config,
        issues: Vec::new(),
    };
    if rule.id.as_str().trim().is_empty() {
        walker.report("id".into(), IssueKind::EmptyId);
    }
    walker.condition("when".into(), &rule.when);

    match &rule.body {
        RuleBody::Passive { blocks } => walker.blocks("body.blocks", blocks),
        RuleBody::Choice { options, .. } => {
            if options.is_empty() {
                walker.report("body.options".into(), IssueKind::EmptyChoice);
            }
            let mut seen = HashSet::new();
            for (i, option) in options.iter().enumerate() {
                let path = format!("body.options[{i}]");
                if !seen.insert(option.value.to_ascii_lowercase()) {
                    walker.report(path.clone(), IssueKind::DuplicateOption(option.value.clone()));
                }
                walker.blocks(&format!("{path}.blocks"), &option.blocks);
            }
        }
        RuleBody::Reminder { .. } => {}
    }
    walker.issues
}

/// Validates every rule and flags ids used more than once.
pub fn validate_rules<'r>(
    rules: impl IntoIterator<Item = &'r Rule>,
    config: &EngineConfig,
) -> Vec<ValidationIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();
    for rule in rules {
        if !seen.insert(&rule.id) {
            issues.push(ValidationIssue {
                rule: rule.id.clone(),
                path: "id".into(),
                kind: IssueKind::DuplicateId,
            });
        }
        issues.extend(validate_rule(rule, config));
    }
    issues
}

struct Walker<'r, 'c> {
    rule: &'r RuleId,
    config: &'c EngineConfig,
    issues: Vec<ValidationIssue>,
}

impl Walker<'_, '_> {
    fn report(&mut self, path: String, kind: IssueKind) {
        self.issues.push(ValidationIssue {
            rule: self.rule.clone(),
            path,
            kind,
        });
    }

    fn condition(&mut self, path: String, condition: &Condition) {
        match condition {
            Condition::True | Condition::False => {}
            Condition::All(children) | Condition::Any(children) => {
                let (name, empty) = match condition {
                    Condition::All(_) => ("all", IssueKind::EmptyAll),
                    _ => ("any", IssueKind::EmptyAny),
                };
                if children.is_empty() {
                    self.report(path.clone(), empty);
                }
                for (i, child) in children.iter().enumerate() {
                    self.condition(format!("{path}.{name}[{i}]"), child);
                }
            }
            Condition::Not(inner) => self.condition(format!("{path}.not"), inner),
            Condition::Atom(Atom::Unrecognized) => self.report(path, IssueKind::UnrecognizedAtom),
            Condition::Atom(_) => {}
            Condition::Unrecognized => self.report(path, IssueKind::UnrecognizedCondition),
        }
    }

    fn blocks(&mut self, path: &str, blocks: &[Block]) {
        for (i, block) in blocks.iter().enumerate() {
            let path = format!("{path}[{i}]");
            match block {
                Block::Do(effects) => {
                    for (j, effect) in effects.iter().enumerate() {
                        self.effect(format!("{path}.do[{j}]"), effect);
                    }
                }
                Block::If { condition, then } => {
                    self.condition(format!("{path}.if"), condition);
                    self.blocks(&format!("{path}.then"), then);
                }
                Block::Unrecognized => self.report(path, IssueKind::UnrecognizedBlock),
            }
        }
    }

    fn effect(&mut self, path: String, effect: &Effect) {
        match effect {
            Effect::InvulnerableSave { threshold } => {
                self.threshold(path, "invulnerable save", *threshold)
            }
            Effect::FeelNoPain { threshold } => self.threshold(path, "feel no pain", *threshold),
            Effect::CriticalHitOn { threshold } => self.threshold(path, "critical hit", *threshold),
            Effect::CriticalWoundOn { threshold } => {
                self.threshold(path, "critical wound", *threshold)
            }
            Effect::GrantWeaponAbility { ability } => match ability {
                WeaponAbility::Anti { threshold, .. } => self.threshold(path, "anti", *threshold),
                WeaponAbility::Unrecognized => self.report(path, IssueKind::UnrecognizedAbility),
                _ => {}
            },
            Effect::GrantUnitAbility { ability } => match ability {
                UnitAbility::FeelNoPain { threshold } => {
                    self.threshold(path, "feel no pain", *threshold)
                }
                UnitAbility::Unrecognized => self.report(path, IssueKind::UnrecognizedAbility),
                _ => {}
            },
            Effect::Unrecognized => self.report(path, IssueKind::UnrecognizedEffect),
            _ => {}
        }
    }

    fn threshold(&mut self, path: String, field: &'static str, value: u8) {
        let (min, max) = (self.config.min_threshold, self.config.die_sides);
        if !(min..=max).contains(&value) {
            self.report(
                path,
                IssueKind::ThresholdOutOfRange {
                    field,
                    value,
                    min,
                    max,
                },
            );
        }
    }
}
