//! Effective profiles: base statistics with accumulated modifiers folded in.

use std::collections::BTreeMap;

use crate::dice::DiceExpr;
use crate::modifiers::{ModifierAccumulator, ModifierKey};
use crate::rule::{
    DefenceStat, RerollKind, RollPhase, UnitAbility, UnitAbilityKind, UnitTraits, WeaponAbility,
    WeaponAbilityKind, WeaponStat, WeaponTraits,
};
use crate::state::{TargetProfile, WeaponProfile, WeaponRange};

/// Critical-wound threshold against one target keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntiThreshold {
    pub keyword: String,
    pub threshold: u8,
}

/// Weapon after the attacker's modifiers are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveWeapon {
    pub name: String,
    pub range: WeaponRange,
    pub attacks: DiceExpr,
    /// Added to each model's attack roll.
    pub attacks_bonus: i32,
    pub skill: u8,
    pub strength: u8,
    pub armour_penetration: u8,
    pub damage: DiceExpr,
    /// Added to each damage roll.
    pub damage_bonus: i32,
    pub traits: WeaponTraits,
    pub sustained_hits: u8,
    pub rapid_fire: u8,
    pub melta: u8,
    pub anti: Vec<AntiThreshold>,
    pub critical_hit_on: Option<u8>,
    pub critical_wound_on: Option<u8>,
    pub hit_modifier: i32,
    pub wound_modifier: i32,
    pub hit_reroll: Option<RerollKind>,
    pub wound_reroll: Option<RerollKind>,
    pub keywords: Vec<String>,
}

impl EffectiveWeapon {
    pub fn derive(base: &WeaponProfile, acc: &ModifierAccumulator) -> Self {
        let stat = |s: WeaponStat| acc.get(&ModifierKey::Weapon(s));
        let granted = |k: WeaponAbilityKind| acc.extremum(&ModifierKey::WeaponAbility(k));

        let mut traits = WeaponTraits::empty();
        let (mut sustained, mut rapid, mut melta) = (0u8, 0u8, 0u8);
        let mut anti: BTreeMap<String, u8> = BTreeMap::new();

        for ability in &base.abilities {
            match ability {
                WeaponAbility::SustainedHits { hits } => sustained = sustained.max(*hits),
                WeaponAbility::RapidFire { attacks } => rapid = rapid.max(*attacks),
                WeaponAbility::Melta { damage } => melta = melta.max(*damage),
                WeaponAbility::Anti { keyword, threshold } => {
                    keep_lowest(&mut anti, keyword.to_ascii_lowercase(), *threshold);
                }
                other => {
                    if let Some(flag) = other.kind().and_then(|k| k.flag()) {
                        traits |= flag;
                    }
                }
            }
        }

        traits |= acc
            .keys()
            .filter_map(|key| match key {
                ModifierKey::WeaponAbility(kind) => kind.flag(),
                _ => None,
            })
            .fold(WeaponTraits::empty(), |all, flag| all | flag);
        sustained = sustained.max(to_u8(granted(WeaponAbilityKind::SustainedHits)));
        rapid = rapid.max(to_u8(granted(WeaponAbilityKind::RapidFire)));
        melta = melta.max(to_u8(granted(WeaponAbilityKind::Melta)));
        for (keyword, threshold) in acc.anti() {
            keep_lowest(&mut anti, keyword.to_string(), to_u8(Some(threshold)));
        }

        let twin_linked = traits
            .contains(WeaponTraits::TWIN_LINKED)
            .then_some(RerollKind::Failed);

        Self {
            name: base.name.clone(),
            range: base.range,
            attacks: base.attacks,
            attacks_bonus: stat(WeaponStat::Attacks),
            skill: base.skill,
            strength: offset(base.strength, stat(WeaponStat::Strength), 1),
            armour_penetration: offset(
                base.armour_penetration,
                stat(WeaponStat::ArmourPenetration),
                0,
            ),
            damage: base.damage,
            damage_bonus: stat(WeaponStat::Damage),
            traits,
            sustained_hits: sustained,
            rapid_fire: rapid,
            melta,
            anti: anti
                .into_iter()
                .map(|(keyword, threshold)| AntiThreshold { keyword, threshold })
                .collect(),
            critical_hit_on: acc.extremum(&ModifierKey::CriticalHit).map(|v| to_u8(Some(v))),
            critical_wound_on: acc
                .extremum(&ModifierKey::CriticalWound)
                .map(|v| to_u8(Some(v))),
            hit_modifier: acc.get(&ModifierKey::Hit),
            wound_modifier: acc.get(&ModifierKey::Wound),
            hit_reroll: acc.reroll(RollPhase::Hit),
            wound_reroll: acc.reroll(RollPhase::Wound).max(twin_linked),
            keywords: base.keywords.clone(),
        }
    }

    pub fn has(&self, traits: WeaponTraits) -> bool {
        self.traits.contains(traits)
    }

    /// Best anti threshold that applies to a target with `keywords`.
    pub fn anti_against(&self, target: &EffectiveTarget) -> Option<u8> {
        self.anti
            .iter()
            .filter(|a| target.has_keyword(&a.keyword))
            .map(|a| a.threshold)
            .min()
    }
}

/// Target after the defender's modifiers are applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveTarget {
    pub name: String,
    pub toughness: u8,
    pub save: u8,
    /// Net save modifier; positive values improve the save.
    pub save_modifier: i32,
    pub invulnerable: Option<u8>,
    pub feel_no_pain: Option<u8>,
    pub damage_reduction: u8,
    pub traits: UnitTraits,
    pub incoming_hit_modifier: i32,
    pub incoming_wound_modifier: i32,
    pub save_reroll: Option<RerollKind>,
    pub models: u16,
    pub keywords: Vec<String>,
}

impl EffectiveTarget {
    pub fn derive(base: &TargetProfile, acc: &ModifierAccumulator) -> Self {
        let mut traits = UnitTraits::empty();
        let mut feel_no_pain = base.feel_no_pain;

        for ability in &base.abilities {
            match ability {
                UnitAbility::FeelNoPain { threshold } => {
                    feel_no_pain = best_lowest(feel_no_pain, Some(*threshold));
                }
                other => {
                    if let Some(flag) = other.kind().and_then(|k| k.flag()) {
                        traits |= flag;
                    }
                }
            }
        }
        traits |= acc
            .keys()
            .filter_map(|key| match key {
                ModifierKey::UnitAbility(kind) => UnitAbilityKind::flag(kind),
                _ => None,
            })
            .fold(UnitTraits::empty(), |all, flag| all | flag);
        feel_no_pain = best_lowest(
            feel_no_pain,
            acc.extremum(&ModifierKey::FeelNoPain).map(|v| to_u8(Some(v))),
        );

        Self {
            name: base.name.clone(),
            toughness: offset(
                base.toughness,
                acc.get(&ModifierKey::Defence(DefenceStat::Toughness)),
                1,
            ),
            save: base.save,
            save_modifier: acc.get(&ModifierKey::Defence(DefenceStat::Save)),
            invulnerable: best_lowest(
                base.invulnerable,
                acc.extremum(&ModifierKey::InvulnerableSave)
                    .map(|v| to_u8(Some(v))),
            ),
            feel_no_pain,
            damage_reduction: to_u8(acc.extremum(&ModifierKey::DamageReduction)),
            traits,
            incoming_hit_modifier: acc.get(&ModifierKey::IncomingHit),
            incoming_wound_modifier: acc.get(&ModifierKey::IncomingWound),
            save_reroll: acc.reroll(RollPhase::Save),
            models: base.models,
            keywords: base.keywords.clone(),
        }
    }

    pub fn has(&self, traits: UnitTraits) -> bool {
        self.traits.contains(traits)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

fn keep_lowest(map: &mut BTreeMap<String, u8>, keyword: String, threshold: u8) {
    map.entry(keyword)
        .and_modify(|t| *t = (*t).min(threshold))
        .or_insert(threshold);
}

fn best_lowest(a: Option<u8>, b: Option<u8>) -> Option<u8> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn offset(base: u8, delta: i32, floor: i32) -> u8 {
    (i32::from(base) + delta).clamp(floor, i32::from(u8::MAX)) as u8
}

fn to_u8(value: Option<i32>) -> u8 {
    value.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleId;

    fn bolter() -> WeaponProfile {
        WeaponProfile::ranged("bolter", 24, DiceExpr::fixed(2), 3, 4, 0, DiceExpr::fixed(1))
            .with_ability(WeaponAbility::SustainedHits { hits: 1 })
            .with_ability(WeaponAbility::Anti {
                keyword: "Infantry".into(),
                threshold: 5,
            })
    }

    #[test]
    fn grants_merge_with_base_abilities() {
        let mut acc = ModifierAccumulator::new();
        let src = RuleId::new("doctrine");
        acc.record(ModifierKey::WeaponAbility(WeaponAbilityKind::SustainedHits), 2, src.clone());
        acc.record(ModifierKey::WeaponAbility(WeaponAbilityKind::LethalHits), 1, src.clone());
        acc.record(ModifierKey::Anti("infantry".into()), 4, src.clone());
        acc.record(ModifierKey::Weapon(WeaponStat::Strength), 1, src.clone());
        acc.record(ModifierKey::Weapon(WeaponStat::ArmourPenetration), 1, src);

        let weapon = EffectiveWeapon::derive(&bolter(), &acc);
        assert_eq!(weapon.sustained_hits, 2);
        assert!(weapon.has(WeaponTraits::LETHAL_HITS));
        assert_eq!(weapon.strength, 5);
        assert_eq!(weapon.armour_penetration, 1);
        assert_eq!(
            weapon.anti,
            vec![AntiThreshold {
                keyword: "infantry".into(),
                threshold: 4
            }]
        );
    }

    #[test]
    fn twin_linked_implies_failed_wound_rerolls() {
        let weapon = bolter().with_ability(WeaponAbility::TwinLinked);
        let mut acc = ModifierAccumulator::new();
        acc.record(
            ModifierKey::Reroll(RollPhase::Wound, RerollKind::Ones),
            1,
            RuleId::new("r"),
        );
        let weapon = EffectiveWeapon::derive(&weapon, &acc);
        assert_eq!(weapon.wound_reroll, Some(RerollKind::Failed));
    }

    #[test]
    fn negative_modifiers_floor() {
        let mut acc = ModifierAccumulator::new();
        acc.record(ModifierKey::Weapon(WeaponStat::ArmourPenetration), -3, RuleId::new("r"));
        acc.record(ModifierKey::Weapon(WeaponStat::Strength), -9, RuleId::new("r"));
        let weapon = EffectiveWeapon::derive(&bolter(), &acc);
        assert_eq!(weapon.armour_penetration, 0);
        assert_eq!(weapon.strength, 1);
    }

    #[test]
    fn target_takes_best_protection() {
        let base = TargetProfile::new("wardens", 4, 3, 5)
            .with_invulnerable(5)
            .with_feel_no_pain(6);
        let mut acc = ModifierAccumulator::new();
        acc.record(ModifierKey::InvulnerableSave, 4, RuleId::new("a"));
        acc.record(ModifierKey::FeelNoPain, 5, RuleId::new("b"));
        acc.record(ModifierKey::UnitAbility(UnitAbilityKind::Stealth), 1, RuleId::new("c"));
        acc.record(ModifierKey::DamageReduction, 1, RuleId::new("d"));

        let target = EffectiveTarget::derive(&base, &acc);
        assert_eq!(target.invulnerable, Some(4));
        assert_eq!(target.feel_no_pain, Some(5));
        assert!(target.has(UnitTraits::STEALTH));
        assert_eq!(target.damage_reduction, 1);
    }
}
