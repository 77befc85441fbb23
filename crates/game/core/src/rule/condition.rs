//! Boolean condition trees.

use crate::rule::{UnitAbilityKind, WeaponAbilityKind};
use crate::state::UnitStatus;

/// Which unit of the pairing an atom inspects, relative to the rule's owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Subject {
    /// The unit whose rule is being evaluated.
    #[default]
    Own,
    /// The unit on the other side of the pairing.
    Opponent,
}

/// Recursive boolean expression deciding whether a rule applies.
///
/// `All` and `Any` must have at least one child; an empty list is malformed
/// and evaluates to `false`. Nodes of unknown shape deserialize to
/// [`Condition::Unrecognized`], which is also `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case", from = "de::ConditionRepr")
)]
pub enum Condition {
    #[default]
    True,
    False,
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
    Atom(Atom),
    Unrecognized,
}

/// Leaf test against the combat context.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "atom", rename_all = "snake_case")
)]
pub enum Atom {
    /// The attacking weapon carries `keyword`.
    WeaponKeyword { keyword: String },
    /// The opposing unit carries `keyword`.
    TargetKeyword { keyword: String },
    /// The subject has `status` in the current turn.
    UnitStatus { subject: Subject, status: UnitStatus },
    /// A live army-wide fact on the rule owner's side.
    ArmyState {
        key: String,
        #[cfg_attr(feature = "serde", serde(default))]
        value: Option<String>,
    },
    /// The rule owner is leading another unit.
    IsLeading,
    /// The attacking weapon's profile carries the ability.
    WeaponHasAbility { ability: WeaponAbilityKind },
    /// The subject's profile carries the ability.
    UnitHasAbility {
        subject: Subject,
        ability: UnitAbilityKind,
    },
    /// Content this engine does not understand; always false.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

impl Condition {
    pub fn all(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(children.into_iter().collect())
    }

    pub fn any(children: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(children.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Condition) -> Self {
        Self::Not(Box::new(inner))
    }

    pub fn weapon_keyword(keyword: impl Into<String>) -> Self {
        Self::Atom(Atom::WeaponKeyword {
            keyword: keyword.into(),
        })
    }

    pub fn target_keyword(keyword: impl Into<String>) -> Self {
        Self::Atom(Atom::TargetKeyword {
            keyword: keyword.into(),
        })
    }

    pub fn status(subject: Subject, status: UnitStatus) -> Self {
        Self::Atom(Atom::UnitStatus { subject, status })
    }

    pub fn army_state(key: impl Into<String>) -> Self {
        Self::Atom(Atom::ArmyState {
            key: key.into(),
            value: None,
        })
    }

    /// Number of nodes in the tree, atoms included.
    pub fn size(&self) -> usize {
        match self {
            Self::True | Self::False | Self::Atom(_) | Self::Unrecognized => 1,
            Self::Not(inner) => 1 + inner.size(),
            Self::All(children) | Self::Any(children) => {
                1 + children.iter().map(Condition::size).sum::<usize>()
            }
        }
    }
}

#[cfg(feature = "serde")]
mod de {
    use serde::Deserialize;
    use serde::de::IgnoredAny;

    use super::{Atom, Condition};

    /// Known combinators first; anything else is kept as an opaque node.
    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum ConditionRepr {
        Known(KnownCondition),
        Unknown(IgnoredAny),
    }

    #[derive(Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub(super) enum KnownCondition {
        True,
        False,
        All(Vec<Condition>),
        Any(Vec<Condition>),
        Not(Box<Condition>),
        Atom(Atom),
    }

    impl From<ConditionRepr> for Condition {
        fn from(repr: ConditionRepr) -> Self {
            match repr {
                ConditionRepr::Known(KnownCondition::True) => Self::True,
                ConditionRepr::Known(KnownCondition::False) => Self::False,
                ConditionRepr::Known(KnownCondition::All(children)) => Self::All(children),
                ConditionRepr::Known(KnownCondition::Any(children)) => Self::Any(children),
                ConditionRepr::Known(KnownCondition::Not(inner)) => Self::Not(inner),
                ConditionRepr::Known(KnownCondition::Atom(atom)) => Self::Atom(atom),
                ConditionRepr::Unknown(_) => Self::Unrecognized,
            }
        }
    }
}
