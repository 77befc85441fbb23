//! Rule selection: trigger filtering, condition evaluation and effect
//! application for one side of a pairing.

use crate::modifiers::{KeySide, ModifierAccumulator, contribution};
use crate::rule::{Atom, Block, ChoiceLifetime, Condition, Rule, RuleBody, RuleId};

use super::{CombatContext, Evaluator, Side, eval_atom};

/// A rule whose effects were applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedRule {
    pub id: RuleId,
    pub name: String,
    /// Selected option, for choice rules.
    pub option: Option<String>,
    /// Effects written into the accumulator.
    pub effects: usize,
}

/// A choice rule whose trigger and condition hold, selected or not.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayableChoice {
    pub id: RuleId,
    pub name: String,
    pub lifetime: ChoiceLifetime,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reminder {
    pub id: RuleId,
    pub name: String,
    pub text: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SkipReason {
    Phase,
    Turn,
    LimitReached,
    ConditionFalse,
    AwaitingChoice,
    UnknownOption,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedRule {
    pub id: RuleId,
    pub reason: SkipReason,
}

/// Malformed content met while evaluating a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum DiagnosticKind {
    MalformedCondition { nodes: usize },
    UnrecognizedBlock,
    UnrecognizedEffect,
    UnknownOption { option: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub rule: RuleId,
    pub kind: DiagnosticKind,
}

/// Outcome of one selection pass.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub applied: Vec<AppliedRule>,
    pub displayable_choices: Vec<DisplayableChoice>,
    pub reminders: Vec<Reminder>,
    pub skipped: Vec<SkippedRule>,
    pub diagnostics: Vec<Diagnostic>,
    pub modifiers: ModifierAccumulator,
}

impl Selection {
    pub fn applied_ids(&self) -> impl Iterator<Item = &RuleId> {
        self.applied.iter().map(|a| &a.id)
    }

    pub fn was_applied(&self, id: &str) -> bool {
        self.applied.iter().any(|a| a.id.as_str() == id)
    }

    pub fn skip_reason(&self, id: &str) -> Option<SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.id.as_str() == id)
            .map(|s| s.reason)
    }
}

/// Runs every candidate rule through the trigger filters and its condition,
/// applying the effects of those that hold.
///
/// Effects that only benefit the other side of the pairing are ignored, so an
/// attacker pass never writes defensive keys and vice versa.
pub fn select_applicable_rules<'r, I>(rules: I, ctx: &CombatContext<'_>) -> Selection
where
    I: IntoIterator<Item = &'r Rule>,
{
    let mut pass = Pass {
        ctx,
        wanted: match ctx.side {
            Side::Attacker => KeySide::Offensive,
            Side::Defender => KeySide::Defensive,
        },
        out: Selection::default(),
    };
    for rule in rules {
        pass.consider(rule);
    }

    tracing::debug!(
        side = ?ctx.side,
        applied = pass.out.applied.len(),
        skipped = pass.out.skipped.len(),
        diagnostics = pass.out.diagnostics.len(),
        "rule selection finished"
    );
    pass.out
}

struct Pass<'c, 'a> {
    ctx: &'c CombatContext<'a>,
    wanted: KeySide,
    out: Selection,
}

impl Pass<'_, '_> {
    fn consider(&mut self, rule: &Rule) {
        let ctx = self.ctx;

        if !rule.trigger.phases.contains(ctx.phase) {
            return self.skip(rule, SkipReason::Phase);
        }
        if !rule.trigger.turn.admits(ctx.is_own_turn()) {
            return self.skip(rule, SkipReason::Turn);
        }
        if !ctx
            .army
            .activations
            .permits(&rule.id, rule.trigger.limit, ctx.turn)
        {
            return self.skip(rule, SkipReason::LimitReached);
        }
        if !self.holds(&rule.id, &rule.when) {
            return self.skip(rule, SkipReason::ConditionFalse);
        }

        match &rule.body {
            RuleBody::Passive { blocks } => {
                let effects = self.walk(&rule.id, blocks);
                self.apply(rule, None, effects);
            }
            RuleBody::Choice { lifetime, options } => {
                let selected = self.selected_option(&rule.id, *lifetime);
                self.out.displayable_choices.push(DisplayableChoice {
                    id: rule.id.clone(),
                    name: rule.name.clone(),
                    lifetime: *lifetime,
                    options: options.iter().map(|o| o.value.clone()).collect(),
                    selected: selected.clone(),
                });

                let Some(selected) = selected else {
                    return self.skip(rule, SkipReason::AwaitingChoice);
                };
                let Some(option) = options
                    .iter()
                    .find(|o| o.value.eq_ignore_ascii_case(&selected))
                else {
                    self.diagnose(&rule.id, DiagnosticKind::UnknownOption { option: selected });
                    return self.skip(rule, SkipReason::UnknownOption);
                };
                let effects = self.walk(&rule.id, &option.blocks);
                self.apply(rule, Some(option.value.clone()), effects);
            }
            RuleBody::Reminder { text } => {
                self.out.reminders.push(Reminder {
                    id: rule.id.clone(),
                    name: rule.name.clone(),
                    text: text.clone(),
                });
            }
        }
    }

    /// Per-resolution choices win over persisted ones.
    fn selected_option(&self, id: &RuleId, lifetime: ChoiceLifetime) -> Option<String> {
        self.ctx.roll_choices.get(id).cloned().or_else(|| {
            self.ctx
                .army
                .choices
                .current(id, lifetime, self.ctx.turn)
                .map(|s| s.option.clone())
        })
    }

    fn holds(&mut self, id: &RuleId, condition: &Condition) -> bool {
        let ctx = self.ctx;
        let mut evaluator = Evaluator::new(|atom: &Atom| eval_atom(ctx, atom));
        let result = evaluator.eval(condition);
        if evaluator.malformed() > 0 {
            self.diagnose(
                id,
                DiagnosticKind::MalformedCondition {
                    nodes: evaluator.malformed(),
                },
            );
        }
        result
    }

    /// Executes blocks in order, returning how many effects were recorded.
    fn walk(&mut self, id: &RuleId, blocks: &[Block]) -> usize {
        let mut written = 0;
        for block in blocks {
            match block {
                Block::Do(effects) => {
                    for effect in effects {
                        let Some((key, value)) = contribution(effect) else {
                            self.diagnose(id, DiagnosticKind::UnrecognizedEffect);
                            continue;
                        };
                        if key.side() != self.wanted {
                            tracing::trace!(rule = %id, %key, "effect belongs to the other side");
                            continue;
                        }
                        self.out.modifiers.record(key, value, id.clone());
                        written += 1;
                    }
                }
                Block::If { condition, then } => {
                    if self.holds(id, condition) {
                        written += self.walk(id, then);
                    }
                }
                Block::Unrecognized => self.diagnose(id, DiagnosticKind::UnrecognizedBlock),
            }
        }
        written
    }

    fn apply(&mut self, rule: &Rule, option: Option<String>, effects: usize) {
        tracing::debug!(rule = %rule.id, ?option, effects, "rule applied");
        self.out.applied.push(AppliedRule {
            id: rule.id.clone(),
            name: rule.name.clone(),
            option,
            effects,
        });
    }

    fn skip(&mut self, rule: &Rule, reason: SkipReason) {
        tracing::trace!(rule = %rule.id, ?reason, "rule skipped");
        self.out.skipped.push(SkippedRule {
            id: rule.id.clone(),
            reason,
        });
    }

    fn diagnose(&mut self, id: &RuleId, kind: DiagnosticKind) {
        tracing::warn!(rule = %id, ?kind, "malformed rule content");
        self.out.diagnostics.push(Diagnostic {
            rule: id.clone(),
            kind,
        });
    }
}
