//! Rule model: trigger metadata, a condition tree and an effect tree.
//!
//! A [`Rule`] is exactly one of three kinds (see [`RuleBody`]):
//!
//! - **Passive**: ordered [`Block`]s executed when the condition holds
//! - **Choice**: player-selected options, each with its own blocks, and a
//!   [`ChoiceLifetime`] controlling how long a selection persists
//! - **Reminder**: no mechanical effect, surfaced to the player at the right time
//!
//! Rule content arrives from an external catalog and is expected to be
//! structurally well-formed already; the engine only guarantees that malformed
//! nodes fail closed.

mod ability;
mod condition;
mod effect;
mod trigger;

pub use ability::{
    UnitAbility, UnitAbilityKind, UnitTraits, WeaponAbility, WeaponAbilityKind, WeaponTraits,
};
pub use condition::{Atom, Condition, Subject};
pub use effect::{Block, DefenceStat, Effect, RerollKind, RollPhase, WeaponStat};
pub use trigger::{ActivationLimit, Phase, PhaseSet, Trigger, TurnFilter};

use core::fmt;

/// Stable identifier of a rule, used for provenance and activation tracking.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RuleId(pub String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Which models a rule's effects cover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Scope {
    Model,
    #[default]
    Unit,
    Army,
}

/// How long a choice selection stays valid before it must be made again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ChoiceLifetime {
    /// Supplied fresh for every resolution.
    PerRoll,
    /// Valid for the turn it was made in.
    PerTurn,
    /// Valid for the rest of the battle.
    PerGame,
}

/// One selectable option of a choice rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceOption {
    pub value: String,
    pub blocks: Vec<Block>,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, blocks: impl IntoIterator<Item = Block>) -> Self {
        Self {
            value: value.into(),
            blocks: blocks.into_iter().collect(),
        }
    }
}

/// The three mutually exclusive rule kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum RuleBody {
    Passive {
        blocks: Vec<Block>,
    },
    Choice {
        lifetime: ChoiceLifetime,
        options: Vec<ChoiceOption>,
    },
    Reminder {
        text: String,
    },
}

/// A named unit of conditional game logic.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Scope,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Trigger,
    #[cfg_attr(feature = "serde", serde(default))]
    pub when: Condition,
    pub body: RuleBody,
}

impl Rule {
    /// A passive rule that always applies its blocks.
    pub fn passive(
        id: impl Into<String>,
        name: impl Into<String>,
        blocks: impl IntoIterator<Item = Block>,
    ) -> Self {
        Self {
            id: RuleId::new(id),
            name: name.into(),
            scope: Scope::default(),
            trigger: Trigger::any(),
            when: Condition::True,
            body: RuleBody::Passive {
                blocks: blocks.into_iter().collect(),
            },
        }
    }

    pub fn choice(
        id: impl Into<String>,
        name: impl Into<String>,
        lifetime: ChoiceLifetime,
        options: impl IntoIterator<Item = ChoiceOption>,
    ) -> Self {
        Self {
            id: RuleId::new(id),
            name: name.into(),
            scope: Scope::default(),
            trigger: Trigger::any(),
            when: Condition::True,
            body: RuleBody::Choice {
                lifetime,
                options: options.into_iter().collect(),
            },
        }
    }

    pub fn reminder(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: RuleId::new(id),
            name: name.into(),
            scope: Scope::default(),
            trigger: Trigger::any(),
            when: Condition::True,
            body: RuleBody::Reminder { text: text.into() },
        }
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, when: Condition) -> Self {
        self.when = when;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}
