//! Condition evaluation and rule selection.

mod condition;
mod context;
mod selector;

pub use condition::{Evaluator, eval_atom, evaluate};
pub use context::{ChoiceMap, CombatContext, Side};
pub use selector::{
    AppliedRule, Diagnostic, DiagnosticKind, DisplayableChoice, Reminder, Selection, SkipReason,
    SkippedRule, select_applicable_rules,
};
