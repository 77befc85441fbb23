use crate::dice::DiceSource;
use crate::rule::WeaponTraits;

use super::resolve::Resolver;
use super::{DieRoll, Step, StepNote, StepRecord};

impl<D: DiceSource + ?Sized> Resolver<'_, D> {
    /// Number of attacks across all firing models.
    pub(super) fn attacks(&mut self) -> (u32, StepRecord) {
        let mut record = StepRecord::new(Step::Attacks);
        let weapon = self.weapon;
        let models = u32::from(self.options.models_firing);

        let rapid = if self.options.within_half_range {
            u32::from(weapon.rapid_fire)
        } else {
            0
        };
        let blast = if weapon.has(WeaponTraits::BLAST) {
            self.options.blast_bonus.unwrap_or_else(|| {
                u32::from(self.target.models) / self.config.blast_divisor.max(1)
            })
        } else {
            0
        };

        let mut total = 0u32;
        for _ in 0..models {
            let roll = weapon.attacks.roll(&mut *self.dice);
            record.dice.extend(roll.faces.iter().copied().map(DieRoll::plain));
            let rolled =
                u32::try_from(i64::from(roll.total) + i64::from(weapon.attacks_bonus)).unwrap_or(0);
            total = total
                .saturating_add(rolled)
                .saturating_add(rapid)
                .saturating_add(blast);
        }

        if rapid > 0 {
            record.notes.push(StepNote::RapidFire {
                attacks: rapid.saturating_mul(models),
            });
        }
        if blast > 0 {
            record.notes.push(StepNote::Blast {
                attacks: blast.saturating_mul(models),
            });
        }
        record.modifier = weapon.attacks_bonus;
        record.successes = total;
        (total, record)
    }
}
