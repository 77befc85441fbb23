//! Condition tree interpreter.
//!
//! Evaluation is pure and short-circuiting. Malformed nodes (empty `all`/`any`,
//! unrecognized combinators or atoms) evaluate to `false` and are counted so
//! the selector can report them without aborting.

use crate::rule::{Atom, Condition};

use super::CombatContext;

/// Walks condition trees, resolving atoms through `atom`.
///
/// `atom` returns `None` for atoms it cannot interpret.
pub struct Evaluator<F> {
    atom: F,
    malformed: usize,
}

impl<F> Evaluator<F>
where
    F: FnMut(&Atom) -> Option<bool>,
{
    pub fn new(atom: F) -> Self {
        Self { atom, malformed: 0 }
    }

    pub fn eval(&mut self, condition: &Condition) -> bool {
        match condition {
            Condition::True => true,
            Condition::False => false,
            Condition::Not(inner) => !self.eval(inner),
            Condition::All(children) => {
                if children.is_empty() {
                    self.malformed += 1;
                    return false;
                }
                children.iter().all(|c| self.eval(c))
            }
            Condition::Any(children) => {
                if children.is_empty() {
                    self.malformed += 1;
                    return false;
                }
                children.iter().any(|c| self.eval(c))
            }
            Condition::Atom(atom) => match (self.atom)(atom) {
                Some(value) => value,
                None => {
                    self.malformed += 1;
                    false
                }
            },
            Condition::Unrecognized => {
                self.malformed += 1;
                false
            }
        }
    }

    /// Malformed nodes met so far.
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

/// Resolves one atom against the context.
pub fn eval_atom(ctx: &CombatContext<'_>, atom: &Atom) -> Option<bool> {
    let value = match atom {
        Atom::WeaponKeyword { keyword } => ctx.weapon.has_keyword(keyword),
        Atom::TargetKeyword { keyword } => ctx.opponent_unit().has_keyword(keyword),
        Atom::UnitStatus { subject, status } => {
            ctx.subject(*subject).has_status(*status, ctx.turn)
        }
        Atom::ArmyState { key, value } => {
            ctx.army
                .is_live(key, value.as_deref(), ctx.turn, ctx.phase)
        }
        Atom::IsLeading => ctx.own_unit().is_leading(),
        // Base profiles only: grants made by other rules in the same pass are
        // not visible here.
        Atom::WeaponHasAbility { ability } => ctx.weapon.has_ability(*ability),
        Atom::UnitHasAbility { subject, ability } => ctx
            .subject(*subject)
            .abilities
            .iter()
            .any(|a| a.kind() == Some(*ability)),
        Atom::Unrecognized => return None,
    };
    Some(value)
}

/// Evaluates `condition` against `ctx`; malformed nodes count as `false`.
pub fn evaluate(condition: &Condition, ctx: &CombatContext<'_>) -> bool {
    Evaluator::new(|atom: &Atom| eval_atom(ctx, atom)).eval(condition)
}
