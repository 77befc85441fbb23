use crate::dice::DiceSource;
use crate::rule::{UnitTraits, WeaponTraits};

use super::resolve::Resolver;
use super::threshold::{RollTest, cap_modifier, clamp_threshold, critical_threshold};
use super::{Step, StepNote, StepRecord};

/// Hits scored and the critical-hit cascades they trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct HitOutcome {
    /// All successful hits, criticals included.
    pub hits: u32,
    pub critical: u32,
    /// Critical hits that wound automatically.
    pub lethal: u32,
    /// Extra hits added to the wound pool.
    pub sustained: u32,
}

impl HitOutcome {
    /// Hits that go on to roll to wound.
    pub fn wound_pool(&self) -> u32 {
        self.hits - self.lethal + self.sustained
    }
}

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    pub(super) fn hits(&mut self, attacks: u32) -> (HitOutcome, StepRecord) {
        let mut record = StepRecord::new(Step::Hit);
        let (weapon, target) = (self.weapon, self.target);

        if weapon.has(WeaponTraits::TORRENT) {
            record.notes.push(StepNote::AutoHit);
            record.successes = attacks;
            let outcome = HitOutcome {
                hits: attacks,
                ..HitOutcome::default()
            };
            return (outcome, record);
        }

        let mut net = weapon.hit_modifier + target.incoming_hit_modifier;
        if weapon.has(WeaponTraits::HEAVY) && self.options.remained_stationary {
            net += 1;
        }
        if weapon.range.is_ranged() && target.has(UnitTraits::STEALTH) {
            net -= 1;
        }
        if weapon.has(WeaponTraits::INDIRECT_FIRE) {
            net -= 1;
        }
        let modifier = cap_modifier(net, self.config.roll_modifier_cap);
        let threshold = clamp_threshold(i32::from(weapon.skill) - modifier, self.config);
        let critical_on = critical_threshold(weapon.critical_hit_on, self.config);
        let test = RollTest::new(threshold, critical_on, self.config);

        record.threshold = Some(threshold);
        record.critical_on = Some(critical_on);
        record.modifier = modifier;
        record.reroll = weapon.hit_reroll;
        if test.is_impossible() {
            record.notes.push(StepNote::Impossible);
        }

        for _ in 0..attacks {
            let die = self.roll(&test, weapon.hit_reroll, self.options.fish_for_criticals);
            record.dice.push(die);
        }

        let hits = record.dice.iter().filter(|d| d.succeeded()).count() as u32;
        let critical = record.dice.iter().filter(|d| d.is_critical()).count() as u32;
        let lethal = if weapon.has(WeaponTraits::LETHAL_HITS) {
            critical
        } else {
            0
        };
        let sustained = critical * u32::from(weapon.sustained_hits);

        if lethal > 0 {
            record.notes.push(StepNote::LethalHits { wounds: lethal });
        }
        if sustained > 0 {
            record.notes.push(StepNote::SustainedHits { hits: sustained });
        }
        record.successes = hits;
        record.criticals = critical;

        let outcome = HitOutcome {
            hits,
            critical,
            lethal,
            sustained,
        };
        (outcome, record)
    }
}
