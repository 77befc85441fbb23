//! Resolution entry point: validates inputs, derives effective profiles and
//! runs the phases in order.

use crate::config::EngineConfig;
use crate::dice::DiceSource;
use crate::error::ResolveError;
use crate::modifiers::ModifierAccumulator;
use crate::rule::RerollKind;
use crate::state::{TargetProfile, WeaponProfile};

use super::threshold::{RollTest, should_reroll};
use super::{
    CombatOptions, CombatResult, CombatSummary, DieRoll, EffectiveTarget, EffectiveWeapon,
    RollFlags,
};

/// Final modifiers of both sides of a pairing.
///
/// The attacker accumulator feeds the weapon, the defender accumulator feeds
/// the target; neither reads the other's keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CombatModifiers {
    pub attacker: ModifierAccumulator,
    pub defender: ModifierAccumulator,
}

impl CombatModifiers {
    pub fn new(attacker: ModifierAccumulator, defender: ModifierAccumulator) -> Self {
        Self { attacker, defender }
    }
}

/// Resolves one weapon against one target with the standard tables.
pub fn resolve_combat<D>(
    weapon: &WeaponProfile,
    target: &TargetProfile,
    options: &CombatOptions,
    modifiers: &CombatModifiers,
    dice: &mut D,
) -> Result<CombatResult, ResolveError>
where
    D: DiceSource + ?Sized,
{
    resolve_combat_with_config(
        weapon,
        target,
        options,
        modifiers,
        dice,
        &EngineConfig::default(),
    )
}

pub fn resolve_combat_with_config<D>(
    weapon: &WeaponProfile,
    target: &TargetProfile,
    options: &CombatOptions,
    modifiers: &CombatModifiers,
    dice: &mut D,
    config: &EngineConfig,
) -> Result<CombatResult, ResolveError>
where
    D: DiceSource + ?Sized,
{
    validate(weapon, target, options, config)?;

    let weapon = EffectiveWeapon::derive(weapon, &modifiers.attacker);
    let target = EffectiveTarget::derive(target, &modifiers.defender);

    let mut resolver = Resolver {
        weapon: &weapon,
        target: &target,
        options,
        config,
        dice,
    };

    let (attacks, attack_record) = resolver.attacks();
    let (hits, hit_record) = resolver.hits(attacks);
    let (wounds, wound_record) = resolver.wounds(&hits);
    let (failed_saves, save_record) = resolver.saves(wounds.to_save);
    let unsaved = failed_saves + wounds.devastating;
    let (damage, damage_record) = resolver.damage(unsaved);
    let (negated, fnp_record) = resolver.feel_no_pain(damage);

    let summary = CombatSummary {
        attacks,
        hits: hits.hits,
        critical_hits: hits.critical,
        lethal_wounds: hits.lethal,
        sustained_hits: hits.sustained,
        wounds: wounds.wounds,
        critical_wounds: wounds.critical,
        devastating_wounds: wounds.devastating,
        saves_attempted: wounds.to_save,
        failed_saves,
        damage,
        damage_negated: negated,
        final_damage: damage.saturating_sub(negated),
    };

    tracing::debug!(
        weapon = %weapon.name,
        target = %target.name,
        attacks,
        hits = summary.hits,
        wounds = summary.wounds,
        failed_saves,
        final_damage = summary.final_damage,
        "combat resolved"
    );

    Ok(CombatResult {
        steps: vec![
            attack_record,
            hit_record,
            wound_record,
            save_record,
            damage_record,
            fnp_record,
        ],
        weapon,
        target,
        summary,
    })
}

fn validate(
    weapon: &WeaponProfile,
    target: &TargetProfile,
    options: &CombatOptions,
    config: &EngineConfig,
) -> Result<(), ResolveError> {
    if options.models_firing == 0 {
        return Err(ResolveError::NoFiringModels);
    }
    if target.models == 0 {
        return Err(ResolveError::EmptyTarget(target.name.clone()));
    }

    let invalid = |profile: &str, field: &'static str, value: u8| ResolveError::InvalidProfile {
        profile: profile.to_string(),
        field,
        value: i32::from(value),
    };
    if weapon.skill == 0 || weapon.skill > config.impossible_threshold() {
        return Err(invalid(&weapon.name, "skill", weapon.skill));
    }
    if weapon.strength == 0 {
        return Err(invalid(&weapon.name, "strength", weapon.strength));
    }
    if target.toughness == 0 {
        return Err(invalid(&target.name, "toughness", target.toughness));
    }
    if target.save == 0 {
        return Err(invalid(&target.name, "save", target.save));
    }
    Ok(())
}

/// Borrowed state shared by every phase of one resolution.
pub(super) struct Resolver<'a, D: ?Sized> {
    pub weapon: &'a EffectiveWeapon,
    pub target: &'a EffectiveTarget,
    pub options: &'a CombatOptions,
    pub config: &'a EngineConfig,
    pub dice: &'a mut D,
}

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    /// Rolls one die against `test`, re-rolling it at most once.
    pub(super) fn roll(
        &mut self,
        test: &RollTest,
        reroll: Option<RerollKind>,
        fish: bool,
    ) -> DieRoll {
        let sides = self.config.die_sides;
        let initial = self.dice.roll(sides);
        let rerolled = should_reroll(test, initial, reroll, fish).then(|| self.dice.roll(sides));
        let face = rerolled.unwrap_or(initial);

        let mut flags = RollFlags::empty();
        flags.set(RollFlags::REROLLED, rerolled.is_some());
        flags.set(RollFlags::SUCCESS, test.succeeds(face));
        flags.set(RollFlags::CRITICAL, test.is_critical(face));

        DieRoll {
            initial,
            rerolled,
            flags,
        }
    }
}
