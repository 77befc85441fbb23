//! Effects and the block trees that apply them.
//!
//! One variant per mechanical consequence, carrying only the fields that kind
//! needs. Unknown kinds deserialize to [`Effect::Unrecognized`] and apply
//! nothing.

use super::{Condition, UnitAbility, WeaponAbility};

/// Weapon characteristic adjusted by an effect.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponStat {
    Attacks,
    Strength,
    /// Positive values make the weapon more penetrating.
    ArmourPenetration,
    Damage,
}

/// Defensive characteristic adjusted by an effect.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DefenceStat {
    Toughness,
    /// Modifier to armour save rolls: +1 improves the save by one.
    Save,
}

/// Roll that a re-roll grant applies to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RollPhase {
    Hit,
    Wound,
    Save,
}

/// Which dice a re-roll grant may pick up.
///
/// Ordered from narrowest to broadest; when several grants apply the broadest
/// wins.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RerollKind {
    Ones,
    Failed,
    All,
}

/// A single typed mechanical consequence.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "effect", rename_all = "snake_case")
)]
pub enum Effect {
    /// Modifier to this unit's hit rolls.
    HitModifier { value: i8 },
    /// Modifier to this unit's wound rolls.
    WoundModifier { value: i8 },
    /// Modifier to hit rolls made against this unit.
    IncomingHitModifier { value: i8 },
    /// Modifier to wound rolls made against this unit.
    IncomingWoundModifier { value: i8 },
    WeaponStat { stat: WeaponStat, value: i8 },
    DefenceStat { stat: DefenceStat, value: i8 },
    GrantWeaponAbility { ability: WeaponAbility },
    GrantUnitAbility { ability: UnitAbility },
    /// Invulnerable save of `threshold`+; the best grant wins.
    InvulnerableSave { threshold: u8 },
    /// Feel No Pain of `threshold`+; the best grant wins.
    FeelNoPain { threshold: u8 },
    /// Unmodified hit rolls of `threshold`+ are critical.
    CriticalHitOn { threshold: u8 },
    /// Unmodified wound rolls of `threshold`+ are critical.
    CriticalWoundOn { threshold: u8 },
    /// Reduce the damage of each attack against this unit (minimum 1).
    DamageReduction { value: u8 },
    Reroll { phase: RollPhase, kind: RerollKind },
    /// Content this engine does not understand; applies nothing.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

/// One step of a rule's effect tree.
///
/// Blocks of unknown shape deserialize to [`Block::Unrecognized`] and apply
/// nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "de::BlockRepr")
)]
pub enum Block {
    /// Apply effects unconditionally.
    #[cfg_attr(feature = "serde", serde(rename = "do"))]
    Do(Vec<Effect>),
    /// Apply nested blocks when `condition` holds.
    #[cfg_attr(feature = "serde", serde(rename = "if"))]
    If {
        condition: Condition,
        then: Vec<Block>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "unrecognized"))]
    Unrecognized,
}

impl Block {
    pub fn effects(effects: impl IntoIterator<Item = Effect>) -> Self {
        Self::Do(effects.into_iter().collect())
    }

    pub fn when(condition: Condition, then: impl IntoIterator<Item = Block>) -> Self {
        Self::If {
            condition,
            then: then.into_iter().collect(),
        }
    }
}

#[cfg(feature = "serde")]
mod de {
    use serde::Deserialize;
    use serde::de::IgnoredAny;

    use super::{Block, Condition, Effect};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum BlockRepr {
        Known(KnownBlock),
        Unknown(IgnoredAny),
    }

    #[derive(Deserialize)]
    pub(super) enum KnownBlock {
        #[serde(rename = "do")]
        Do(Vec<Effect>),
        #[serde(rename = "if")]
        If {
            condition: Condition,
            then: Vec<Block>,
        },
    }

    impl From<BlockRepr> for Block {
        fn from(repr: BlockRepr) -> Self {
            match repr {
                BlockRepr::Known(KnownBlock::Do(effects)) => Self::Do(effects),
                BlockRepr::Known(KnownBlock::If { condition, then }) => {
                    Self::If { condition, then }
                }
                BlockRepr::Unknown(_) => Self::Unrecognized,
            }
        }
    }
}
