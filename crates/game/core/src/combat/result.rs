//! Structured, replayable combat records.

use bitflags::bitflags;

use crate::rule::RerollKind;

use super::{EffectiveTarget, EffectiveWeapon, SaveKind};

bitflags! {
    /// Outcome bits of one die.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RollFlags: u8 {
        const SUCCESS  = 1 << 0;
        const CRITICAL = 1 << 1;
        const REROLLED = 1 << 2;
    }
}

/// One die, with its re-roll if it had one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieRoll {
    pub initial: u8,
    pub rerolled: Option<u8>,
    pub flags: RollFlags,
}

impl DieRoll {
    /// A die recorded for its value only (attack and damage rolls).
    pub fn plain(face: u8) -> Self {
        Self {
            initial: face,
            rerolled: None,
            flags: RollFlags::empty(),
        }
    }

    pub fn final_value(&self) -> u8 {
        self.rerolled.unwrap_or(self.initial)
    }

    pub fn succeeded(&self) -> bool {
        self.flags.contains(RollFlags::SUCCESS)
    }

    pub fn is_critical(&self) -> bool {
        self.flags.contains(RollFlags::CRITICAL)
    }

    pub fn was_rerolled(&self) -> bool {
        self.flags.contains(RollFlags::REROLLED)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Attacks,
    Hit,
    Wound,
    Save,
    Damage,
    FeelNoPain,
}

/// Why a step's numbers differ from the plain dice.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "note", rename_all = "snake_case")
)]
pub enum StepNote {
    RapidFire { attacks: u32 },
    Blast { attacks: u32 },
    /// Every attack hit without a roll.
    AutoHit,
    LethalHits { wounds: u32 },
    SustainedHits { hits: u32 },
    DevastatingWounds { wounds: u32 },
    Cover,
    SaveUsed { kind: SaveKind },
    /// No save could succeed, so none was rolled.
    FastPath,
    /// The threshold could not be met; every die failed.
    Impossible,
    Melta { damage: u32 },
    DamageReduced { by: u8 },
}

/// Every die of one phase and what came of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub step: Step,
    pub threshold: Option<u8>,
    pub critical_on: Option<u8>,
    /// Net modifier after capping.
    pub modifier: i32,
    pub reroll: Option<RerollKind>,
    pub dice: Vec<DieRoll>,
    pub successes: u32,
    pub criticals: u32,
    pub notes: Vec<StepNote>,
}

impl StepRecord {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            threshold: None,
            critical_on: None,
            modifier: 0,
            reroll: None,
            dice: Vec::new(),
            successes: 0,
            criticals: 0,
            notes: Vec::new(),
        }
    }

    pub fn rerolled(&self) -> usize {
        self.dice.iter().filter(|d| d.was_rerolled()).count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSummary {
    pub attacks: u32,
    pub hits: u32,
    pub critical_hits: u32,
    pub lethal_wounds: u32,
    pub sustained_hits: u32,
    pub wounds: u32,
    pub critical_wounds: u32,
    pub devastating_wounds: u32,
    pub saves_attempted: u32,
    pub failed_saves: u32,
    pub damage: u32,
    pub damage_negated: u32,
    pub final_damage: u32,
}

/// Complete outcome of one weapon/target resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub weapon: EffectiveWeapon,
    pub target: EffectiveTarget,
    pub steps: Vec<StepRecord>,
    pub summary: CombatSummary,
}

impl CombatResult {
    pub fn step(&self, step: Step) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.step == step)
    }
}
