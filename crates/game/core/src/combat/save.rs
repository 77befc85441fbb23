use crate::dice::DiceSource;
use crate::rule::WeaponTraits;

use super::resolve::Resolver;
use super::threshold::{RollTest, clamp_threshold, select_save};
use super::{Step, StepNote, StepRecord};

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    /// Rolls saves for `wounds`, returning how many failed.
    pub(super) fn saves(&mut self, wounds: u32) -> (u32, StepRecord) {
        let mut record = StepRecord::new(Step::Save);
        let (weapon, target) = (self.weapon, self.target);
        let ap = i32::from(weapon.armour_penetration);

        let in_cover = self.options.in_cover || weapon.has(WeaponTraits::INDIRECT_FIRE);
        let cover = in_cover
            && !weapon.has(WeaponTraits::IGNORES_COVER)
            && !(ap == 0 && target.save <= 3);
        let improvement = (target.save_modifier + i32::from(cover))
            .min(self.config.save_improvement_cap);

        let armour = clamp_threshold(i32::from(target.save) + ap - improvement, self.config);
        let selection = select_save(armour, target.invulnerable, self.config);
        let test = RollTest::plain(selection.threshold, self.config);

        record.threshold = Some(selection.threshold);
        record.modifier = improvement - ap;
        record.reroll = target.save_reroll;
        if cover {
            record.notes.push(StepNote::Cover);
        }
        record.notes.push(StepNote::SaveUsed {
            kind: selection.kind,
        });

        if test.is_impossible() {
            if weapon.damage.is_fixed() && !self.options.force_full_rolls {
                record.notes.push(StepNote::FastPath);
                return (wounds, record);
            }
            record.notes.push(StepNote::Impossible);
        }

        for _ in 0..wounds {
            let die = self.roll(&test, target.save_reroll, false);
            record.dice.push(die);
        }
        let saved = record.dice.iter().filter(|d| d.succeeded()).count() as u32;
        record.successes = saved;
        (wounds - saved, record)
    }
}
