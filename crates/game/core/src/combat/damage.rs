use crate::dice::DiceSource;

use super::resolve::Resolver;
use super::threshold::{RollTest, clamp_threshold};
use super::{DieRoll, Step, StepNote, StepRecord};

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    /// Total damage of `unsaved` attacks. Each attack deals at least 1.
    pub(super) fn damage(&mut self, unsaved: u32) -> (u32, StepRecord) {
        let mut record = StepRecord::new(Step::Damage);
        let (weapon, target) = (self.weapon, self.target);

        let melta = if self.options.within_half_range {
            i64::from(weapon.melta)
        } else {
            0
        };
        let reduction = i64::from(target.damage_reduction);

        let mut total = 0u32;
        for _ in 0..unsaved {
            let roll = weapon.damage.roll(&mut *self.dice);
            record.dice.extend(roll.faces.iter().copied().map(DieRoll::plain));
            let dealt = i64::from(roll.total) + i64::from(weapon.damage_bonus) + melta - reduction;
            total += dealt.max(1) as u32;
        }

        if unsaved > 0 && melta > 0 {
            record.notes.push(StepNote::Melta {
                damage: melta as u32 * unsaved,
            });
        }
        if unsaved > 0 && reduction > 0 {
            record.notes.push(StepNote::DamageReduced {
                by: target.damage_reduction,
            });
        }
        record.modifier = weapon.damage_bonus;
        record.successes = total;
        (total, record)
    }

    /// Rolls Feel No Pain per point of `damage`, returning points negated.
    pub(super) fn feel_no_pain(&mut self, damage: u32) -> (u32, StepRecord) {
        let mut record = StepRecord::new(Step::FeelNoPain);
        let Some(raw) = self.target.feel_no_pain else {
            return (0, record);
        };

        let threshold = clamp_threshold(i32::from(raw), self.config);
        let test = RollTest::plain(threshold, self.config);
        record.threshold = Some(threshold);
        if test.is_impossible() {
            record.notes.push(StepNote::Impossible);
            return (0, record);
        }

        for _ in 0..damage {
            let die = self.roll(&test, None, false);
            record.dice.push(die);
        }
        let negated = record.dice.iter().filter(|d| d.succeeded()).count() as u32;
        record.successes = negated;
        (negated, record)
    }
}
