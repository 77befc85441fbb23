//! Modifier accumulation.
//!
//! Effects are translated into `(key, value)` contributions and written into a
//! [`ModifierAccumulator`] together with the id of the rule that produced them.

mod accumulator;
mod key;

pub use accumulator::{ModifierAccumulator, ModifierEntry, ModifierLine};
pub use key::{Better, Combine, KeySide, ModifierKey};

use crate::rule::{Effect, RuleId, UnitAbility, WeaponAbility};

/// The key and value an effect writes, or `None` when it writes nothing.
pub fn contribution(effect: &Effect) -> Option<(ModifierKey, i32)> {
    let pair = match effect {
        Effect::HitModifier { value } => (ModifierKey::Hit, i32::from(*value)),
        Effect::WoundModifier { value } => (ModifierKey::Wound, i32::from(*value)),
        Effect::IncomingHitModifier { value } => (ModifierKey::IncomingHit, i32::from(*value)),
        Effect::IncomingWoundModifier { value } => {
            (ModifierKey::IncomingWound, i32::from(*value))
        }
        Effect::WeaponStat { stat, value } => (ModifierKey::Weapon(*stat), i32::from(*value)),
        Effect::DefenceStat { stat, value } => (ModifierKey::Defence(*stat), i32::from(*value)),
        Effect::GrantWeaponAbility { ability } => weapon_grant(ability)?,
        Effect::GrantUnitAbility { ability } => unit_grant(ability)?,
        Effect::InvulnerableSave { threshold } => {
            (ModifierKey::InvulnerableSave, i32::from(*threshold))
        }
        Effect::FeelNoPain { threshold } => (ModifierKey::FeelNoPain, i32::from(*threshold)),
        Effect::CriticalHitOn { threshold } => (ModifierKey::CriticalHit, i32::from(*threshold)),
        Effect::CriticalWoundOn { threshold } => {
            (ModifierKey::CriticalWound, i32::from(*threshold))
        }
        Effect::DamageReduction { value } => (ModifierKey::DamageReduction, i32::from(*value)),
        Effect::Reroll { phase, kind } => (ModifierKey::Reroll(*phase, *kind), 1),
        Effect::Unrecognized => return None,
    };
    Some(pair)
}

fn weapon_grant(ability: &WeaponAbility) -> Option<(ModifierKey, i32)> {
    let value = match ability {
        WeaponAbility::SustainedHits { hits } => i32::from(*hits),
        WeaponAbility::RapidFire { attacks } => i32::from(*attacks),
        WeaponAbility::Melta { damage } => i32::from(*damage),
        WeaponAbility::Anti { keyword, threshold } => {
            return Some((
                ModifierKey::Anti(keyword.to_ascii_lowercase()),
                i32::from(*threshold),
            ));
        }
        _ => 1,
    };
    Some((ModifierKey::WeaponAbility(ability.kind()?), value))
}

fn unit_grant(ability: &UnitAbility) -> Option<(ModifierKey, i32)> {
    match ability {
        UnitAbility::FeelNoPain { threshold } => {
            Some((ModifierKey::FeelNoPain, i32::from(*threshold)))
        }
        other => Some((ModifierKey::UnitAbility(other.kind()?), 1)),
    }
}

/// Writes `effect` into `acc`, returning whether anything was recorded.
pub fn apply_effect(acc: &mut ModifierAccumulator, effect: &Effect, source: &RuleId) -> bool {
    match contribution(effect) {
        Some((key, value)) => {
            acc.record(key, value, source.clone());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RerollKind, RollPhase, UnitAbilityKind, WeaponAbilityKind};

    #[test]
    fn grants_map_to_their_keys() {
        let mut acc = ModifierAccumulator::new();
        let src = RuleId::new("src");
        assert!(apply_effect(
            &mut acc,
            &Effect::GrantWeaponAbility {
                ability: WeaponAbility::SustainedHits { hits: 2 }
            },
            &src,
        ));
        assert!(apply_effect(
            &mut acc,
            &Effect::GrantWeaponAbility {
                ability: WeaponAbility::Anti {
                    keyword: "Vehicle".into(),
                    threshold: 4
                }
            },
            &src,
        ));
        assert!(apply_effect(
            &mut acc,
            &Effect::GrantUnitAbility {
                ability: UnitAbility::Stealth
            },
            &src,
        ));

        assert_eq!(
            acc.get(&ModifierKey::WeaponAbility(WeaponAbilityKind::SustainedHits)),
            2
        );
        assert_eq!(acc.get(&ModifierKey::Anti("vehicle".into())), 4);
        assert!(acc.has(&ModifierKey::UnitAbility(UnitAbilityKind::Stealth)));
    }

    #[test]
    fn unit_feel_no_pain_grant_joins_threshold_key() {
        let mut acc = ModifierAccumulator::new();
        let src = RuleId::new("src");
        apply_effect(&mut acc, &Effect::FeelNoPain { threshold: 6 }, &src);
        apply_effect(
            &mut acc,
            &Effect::GrantUnitAbility {
                ability: UnitAbility::FeelNoPain { threshold: 5 },
            },
            &src,
        );
        assert_eq!(acc.extremum(&ModifierKey::FeelNoPain), Some(5));
    }

    #[test]
    fn unrecognized_effects_write_nothing() {
        let mut acc = ModifierAccumulator::new();
        let src = RuleId::new("src");
        assert!(!apply_effect(&mut acc, &Effect::Unrecognized, &src));
        assert!(!apply_effect(
            &mut acc,
            &Effect::GrantWeaponAbility {
                ability: WeaponAbility::Unrecognized
            },
            &src,
        ));
        assert!(acc.is_empty());
    }

    #[test]
    fn save_rerolls_are_defensive() {
        let (key, _) = contribution(&Effect::Reroll {
            phase: RollPhase::Save,
            kind: RerollKind::Ones,
        })
        .unwrap();
        assert_eq!(key.side(), KeySide::Defensive);
        let (key, _) = contribution(&Effect::HitModifier { value: 1 }).unwrap();
        assert_eq!(key.side(), KeySide::Offensive);
    }
}
