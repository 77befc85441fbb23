//! Accumulator keys and how each combines.

use core::fmt;

use crate::rule::{
    DefenceStat, RerollKind, RollPhase, UnitAbilityKind, WeaponAbilityKind, WeaponStat,
};

/// Category a modifier contributes to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKey {
    Hit,
    Wound,
    IncomingHit,
    IncomingWound,
    Weapon(WeaponStat),
    Defence(DefenceStat),
    /// Presence (flags) or best parameter of a granted weapon ability.
    WeaponAbility(WeaponAbilityKind),
    /// Critical-wound threshold against targets with this keyword (lowercased).
    Anti(String),
    UnitAbility(UnitAbilityKind),
    InvulnerableSave,
    FeelNoPain,
    CriticalHit,
    CriticalWound,
    DamageReduction,
    Reroll(RollPhase, RerollKind),
}

/// Which end of an extremum is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Better {
    Lowest,
    Highest,
}

impl Better {
    pub fn pick(self, a: i32, b: i32) -> i32 {
        match self {
            Self::Lowest => a.min(b),
            Self::Highest => a.max(b),
        }
    }
}

/// Aggregation rule of a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Combine {
    Sum,
    Extremum(Better),
}

/// Side of a pairing a key benefits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySide {
    Offensive,
    Defensive,
}

impl ModifierKey {
    pub fn combine(&self) -> Combine {
        match self {
            Self::Hit
            | Self::Wound
            | Self::IncomingHit
            | Self::IncomingWound
            | Self::Weapon(_)
            | Self::Defence(_) => Combine::Sum,
            Self::Anti(_)
            | Self::InvulnerableSave
            | Self::FeelNoPain
            | Self::CriticalHit
            | Self::CriticalWound => Combine::Extremum(Better::Lowest),
            Self::WeaponAbility(_)
            | Self::UnitAbility(_)
            | Self::DamageReduction
            | Self::Reroll(..) => Combine::Extremum(Better::Highest),
        }
    }

    pub fn side(&self) -> KeySide {
        match self {
            Self::Hit
            | Self::Wound
            | Self::Weapon(_)
            | Self::WeaponAbility(_)
            | Self::Anti(_)
            | Self::CriticalHit
            | Self::CriticalWound
            | Self::Reroll(RollPhase::Hit | RollPhase::Wound, _) => KeySide::Offensive,
            Self::IncomingHit
            | Self::IncomingWound
            | Self::Defence(_)
            | Self::UnitAbility(_)
            | Self::InvulnerableSave
            | Self::FeelNoPain
            | Self::DamageReduction
            | Self::Reroll(RollPhase::Save, _) => KeySide::Defensive,
        }
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hit => f.write_str("hit"),
            Self::Wound => f.write_str("wound"),
            Self::IncomingHit => f.write_str("incoming_hit"),
            Self::IncomingWound => f.write_str("incoming_wound"),
            Self::Weapon(stat) => write!(f, "weapon.{stat}"),
            Self::Defence(stat) => write!(f, "defence.{stat}"),
            Self::WeaponAbility(kind) => write!(f, "weapon_ability.{kind}"),
            Self::Anti(keyword) => write!(f, "anti.{keyword}"),
            Self::UnitAbility(kind) => write!(f, "unit_ability.{kind}"),
            Self::InvulnerableSave => f.write_str("invulnerable_save"),
            Self::FeelNoPain => f.write_str("feel_no_pain"),
            Self::CriticalHit => f.write_str("critical_hit"),
            Self::CriticalWound => f.write_str("critical_wound"),
            Self::DamageReduction => f.write_str("damage_reduction"),
            Self::Reroll(phase, kind) => write!(f, "reroll.{phase}.{kind}"),
        }
    }
}
