//! Typed weapon and unit abilities.
//!
//! Flag abilities collapse into [`WeaponTraits`] / [`UnitTraits`] bitsets once
//! base profile and granted abilities are merged; parameterised abilities keep
//! their best value (see [`crate::combat::EffectiveWeapon`]).

use bitflags::bitflags;

/// Ability carried by (or granted to) a weapon.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "ability", rename_all = "snake_case")
)]
pub enum WeaponAbility {
    /// Critical hits wound automatically.
    LethalHits,
    /// Attacks hit automatically; no hit roll is made.
    Torrent,
    /// Failed wound rolls may be re-rolled.
    TwinLinked,
    /// Critical wounds bypass saving throws.
    DevastatingWounds,
    /// +1 to wound when the bearer charged this turn.
    Lance,
    /// +1 to hit when the bearer remained stationary.
    Heavy,
    /// The target never benefits from cover.
    IgnoresCover,
    /// +1 attack per full five target models.
    Blast,
    /// -1 to hit and the target counts as in cover.
    IndirectFire,
    /// Each critical hit scores additional hits.
    SustainedHits { hits: u8 },
    /// Additional attacks within half range.
    RapidFire { attacks: u8 },
    /// Additional damage within half range.
    Melta { damage: u8 },
    /// Wound rolls of `threshold`+ against `keyword` targets are critical.
    Anti { keyword: String, threshold: u8 },
    /// Content this engine does not understand; ignored.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

/// Parameter-free identity of a [`WeaponAbility`].
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
pub enum WeaponAbilityKind {
    LethalHits,
    Torrent,
    TwinLinked,
    DevastatingWounds,
    Lance,
    Heavy,
    IgnoresCover,
    Blast,
    IndirectFire,
    SustainedHits,
    RapidFire,
    Melta,
    Anti,
}

bitflags! {
    /// Flag abilities present on an effective weapon.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WeaponTraits: u16 {
        const LETHAL_HITS        = 1 << 0;
        const TORRENT            = 1 << 1;
        const TWIN_LINKED        = 1 << 2;
        const DEVASTATING_WOUNDS = 1 << 3;
        const LANCE              = 1 << 4;
        const HEAVY              = 1 << 5;
        const IGNORES_COVER      = 1 << 6;
        const BLAST              = 1 << 7;
        const INDIRECT_FIRE      = 1 << 8;
    }
}

impl WeaponAbility {
    pub fn kind(&self) -> Option<WeaponAbilityKind> {
        Some(match self {
            Self::LethalHits => WeaponAbilityKind::LethalHits,
            Self::Torrent => WeaponAbilityKind::Torrent,
            Self::TwinLinked => WeaponAbilityKind::TwinLinked,
            Self::DevastatingWounds => WeaponAbilityKind::DevastatingWounds,
            Self::Lance => WeaponAbilityKind::Lance,
            Self::Heavy => WeaponAbilityKind::Heavy,
            Self::IgnoresCover => WeaponAbilityKind::IgnoresCover,
            Self::Blast => WeaponAbilityKind::Blast,
            Self::IndirectFire => WeaponAbilityKind::IndirectFire,
            Self::SustainedHits { .. } => WeaponAbilityKind::SustainedHits,
            Self::RapidFire { .. } => WeaponAbilityKind::RapidFire,
            Self::Melta { .. } => WeaponAbilityKind::Melta,
            Self::Anti { .. } => WeaponAbilityKind::Anti,
            Self::Unrecognized => return None,
        })
    }
}

impl WeaponAbilityKind {
    /// The bit for flag abilities; `None` for parameterised ones.
    pub const fn flag(&self) -> Option<WeaponTraits> {
        match self {
            Self::LethalHits => Some(WeaponTraits::LETHAL_HITS),
            Self::Torrent => Some(WeaponTraits::TORRENT),
            Self::TwinLinked => Some(WeaponTraits::TWIN_LINKED),
            Self::DevastatingWounds => Some(WeaponTraits::DEVASTATING_WOUNDS),
            Self::Lance => Some(WeaponTraits::LANCE),
            Self::Heavy => Some(WeaponTraits::HEAVY),
            Self::IgnoresCover => Some(WeaponTraits::IGNORES_COVER),
            Self::Blast => Some(WeaponTraits::BLAST),
            Self::IndirectFire => Some(WeaponTraits::INDIRECT_FIRE),
            Self::SustainedHits | Self::RapidFire | Self::Melta | Self::Anti => None,
        }
    }
}

/// Ability carried by (or granted to) a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "ability", rename_all = "snake_case")
)]
pub enum UnitAbility {
    DeepStrike,
    /// -1 to be hit by ranged attacks.
    Stealth,
    LoneOperative,
    Infiltrators,
    FightsFirst,
    /// Each point of damage is ignored on a roll of `threshold`+.
    FeelNoPain { threshold: u8 },
    /// Content this engine does not understand; ignored.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

/// Parameter-free identity of a [`UnitAbility`].
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
pub enum UnitAbilityKind {
    DeepStrike,
    Stealth,
    LoneOperative,
    Infiltrators,
    FightsFirst,
    FeelNoPain,
}

bitflags! {
    /// Flag abilities present on an effective target.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitTraits: u8 {
        const DEEP_STRIKE    = 1 << 0;
        const STEALTH        = 1 << 1;
        const LONE_OPERATIVE = 1 << 2;
        const INFILTRATORS   = 1 << 3;
        const FIGHTS_FIRST   = 1 << 4;
    }
}

impl UnitAbility {
    pub fn kind(&self) -> Option<UnitAbilityKind> {
        Some(match self {
            Self::DeepStrike => UnitAbilityKind::DeepStrike,
            Self::Stealth => UnitAbilityKind::Stealth,
            Self::LoneOperative => UnitAbilityKind::LoneOperative,
            Self::Infiltrators => UnitAbilityKind::Infiltrators,
            Self::FightsFirst => UnitAbilityKind::FightsFirst,
            Self::FeelNoPain { .. } => UnitAbilityKind::FeelNoPain,
            Self::Unrecognized => return None,
        })
    }
}

impl UnitAbilityKind {
    pub const fn flag(&self) -> Option<UnitTraits> {
        match self {
            Self::DeepStrike => Some(UnitTraits::DEEP_STRIKE),
            Self::Stealth => Some(UnitTraits::STEALTH),
            Self::LoneOperative => Some(UnitTraits::LONE_OPERATIVE),
            Self::Infiltrators => Some(UnitTraits::INFILTRATORS),
            Self::FightsFirst => Some(UnitTraits::FIGHTS_FIRST),
            Self::FeelNoPain => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_abilities_map_to_bits() {
        let kind = WeaponAbility::LethalHits.kind().unwrap();
        assert_eq!(kind.flag(), Some(WeaponTraits::LETHAL_HITS));
        assert_eq!(WeaponAbility::SustainedHits { hits: 1 }.kind().unwrap().flag(), None);
        assert_eq!(WeaponAbility::Unrecognized.kind(), None);
    }

    #[test]
    fn unit_ability_kinds() {
        assert_eq!(
            UnitAbility::FeelNoPain { threshold: 5 }.kind(),
            Some(UnitAbilityKind::FeelNoPain)
        );
        assert_eq!(UnitAbilityKind::Stealth.flag(), Some(UnitTraits::STEALTH));
        assert_eq!(
            "deep_strike".parse::<UnitAbilityKind>().unwrap(),
            UnitAbilityKind::DeepStrike
        );
    }
}
