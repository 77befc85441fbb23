use crate::dice::DiceSource;
use crate::rule::WeaponTraits;

use super::hit::HitOutcome;
use super::resolve::Resolver;
use super::threshold::{
    RollTest, cap_modifier, clamp_threshold, critical_threshold, wound_threshold,
};
use super::{Step, StepNote, StepRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct WoundOutcome {
    /// Rolled wounds plus automatic wounds from lethal hits.
    pub wounds: u32,
    pub critical: u32,
    /// Critical wounds that skip the save.
    pub devastating: u32,
    /// Wounds that go on to the save step.
    pub to_save: u32,
}

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    pub(super) fn wounds(&mut self, hits: &HitOutcome) -> (WoundOutcome, StepRecord) {
        let mut record = StepRecord::new(Step::Wound);
        let (weapon, target) = (self.weapon, self.target);
        let pool = hits.wound_pool();

        let mut net = weapon.wound_modifier + target.incoming_wound_modifier;
        if weapon.has(WeaponTraits::LANCE) && self.options.charged {
            net += 1;
        }
        let modifier = cap_modifier(net, self.config.roll_modifier_cap);
        let base = wound_threshold(weapon.strength, target.toughness);
        let threshold = clamp_threshold(i32::from(base) - modifier, self.config);

        let lowered = match (weapon.critical_wound_on, weapon.anti_against(target)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let critical_on = critical_threshold(lowered, self.config);
        let test = RollTest::new(threshold, critical_on, self.config);

        record.threshold = Some(threshold);
        record.critical_on = Some(critical_on);
        record.modifier = modifier;
        record.reroll = weapon.wound_reroll;
        if test.is_impossible() {
            record.notes.push(StepNote::Impossible);
        }

        for _ in 0..pool {
            let die = self.roll(&test, weapon.wound_reroll, self.options.fish_for_criticals);
            record.dice.push(die);
        }

        let rolled = record.dice.iter().filter(|d| d.succeeded()).count() as u32;
        let critical = record.dice.iter().filter(|d| d.is_critical()).count() as u32;
        let devastating = if weapon.has(WeaponTraits::DEVASTATING_WOUNDS) {
            critical
        } else {
            0
        };

        if hits.lethal > 0 {
            record.notes.push(StepNote::LethalHits {
                wounds: hits.lethal,
            });
        }
        if devastating > 0 {
            record
                .notes
                .push(StepNote::DevastatingWounds { wounds: devastating });
        }
        record.successes = rolled;
        record.criticals = critical;

        let outcome = WoundOutcome {
            wounds: rolled + hits.lethal,
            critical,
            devastating,
            to_save: rolled - devastating + hits.lethal,
        };
        (outcome, record)
    }
}
