//! Immutable weapon and target statistics.
//!
//! Resolution never mutates these; it derives effective copies
//! (see [`crate::combat::EffectiveWeapon`]).

use crate::dice::DiceExpr;
use crate::rule::{UnitAbility, WeaponAbility, WeaponAbilityKind};

/// Melee or ranged, with range in inches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WeaponRange {
    Melee,
    Ranged(u8),
}

impl WeaponRange {
    pub const fn is_ranged(&self) -> bool {
        matches!(self, Self::Ranged(_))
    }
}

/// Attack profile of a weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponProfile {
    pub name: String,
    pub range: WeaponRange,
    pub attacks: DiceExpr,
    /// Ballistic or weapon skill, as an `N+` threshold.
    pub skill: u8,
    pub strength: u8,
    /// Armour penetration as a magnitude: AP1 worsens a save by one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub armour_penetration: u8,
    pub damage: DiceExpr,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<WeaponAbility>,
}

impl WeaponProfile {
    pub fn ranged(
        name: impl Into<String>,
        range: u8,
        attacks: DiceExpr,
        skill: u8,
        strength: u8,
        armour_penetration: u8,
        damage: DiceExpr,
    ) -> Self {
        Self {
            name: name.into(),
            range: WeaponRange::Ranged(range),
            attacks,
            skill,
            strength,
            armour_penetration,
            damage,
            keywords: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn melee(
        name: impl Into<String>,
        attacks: DiceExpr,
        skill: u8,
        strength: u8,
        armour_penetration: u8,
        damage: DiceExpr,
    ) -> Self {
        Self {
            range: WeaponRange::Melee,
            ..Self::ranged(name, 0, attacks, skill, strength, armour_penetration, damage)
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: WeaponAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Whether the base profile carries an ability of this kind.
    pub fn has_ability(&self, kind: WeaponAbilityKind) -> bool {
        self.abilities.iter().any(|a| a.kind() == Some(kind))
    }
}

/// Defensive profile of a target unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetProfile {
    pub name: String,
    pub toughness: u8,
    pub save: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub invulnerable: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub feel_no_pain: Option<u8>,
    pub models: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<UnitAbility>,
}

impl TargetProfile {
    pub fn new(name: impl Into<String>, toughness: u8, save: u8, models: u16) -> Self {
        Self {
            name: name.into(),
            toughness,
            save,
            invulnerable: None,
            feel_no_pain: None,
            models,
            keywords: Vec::new(),
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_invulnerable(mut self, threshold: u8) -> Self {
        self.invulnerable = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_feel_no_pain(mut self, threshold: u8) -> Self {
        self.feel_no_pain = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}
