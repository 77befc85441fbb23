//! Shared threshold arithmetic.
//!
//! Thresholds are "roll N or more" targets on a single die. Every threshold the
//! engine produces lies in `min_threshold..=impossible_threshold`; the upper
//! end means the roll cannot succeed at all.

use crate::config::EngineConfig;
use crate::rule::RerollKind;

/// Clamps a raw threshold into the achievable range.
pub fn clamp_threshold(raw: i32, config: &EngineConfig) -> u8 {
    let floor = i32::from(config.min_threshold);
    let ceiling = i32::from(config.impossible_threshold());
    raw.clamp(floor, ceiling.max(floor)) as u8
}

pub fn is_impossible(threshold: u8, config: &EngineConfig) -> bool {
    threshold >= config.impossible_threshold()
}

/// Limits a net roll modifier to `±cap`.
pub fn cap_modifier(net: i32, cap: i32) -> i32 {
    let cap = cap.abs();
    net.clamp(-cap, cap)
}

/// Roll at or above which a die is critical: the natural maximum, or a lower
/// value granted by an ability.
pub fn critical_threshold(lowered: Option<u8>, config: &EngineConfig) -> u8 {
    let natural = config.natural_critical();
    lowered
        .map_or(natural, |t| t.min(natural))
        .max(config.min_threshold)
}

/// Base wound roll from the strength/toughness comparison.
///
/// Half toughness is rounded up, and strength must exceed it to wound on 5+.
pub fn wound_threshold(strength: u8, toughness: u8) -> u8 {
    let (s, t) = (u16::from(strength), u16::from(toughness));
    let half = t.div_ceil(2);
    if s >= t * 2 {
        2
    } else if s > t {
        3
    } else if s == t {
        4
    } else if s > half {
        5
    } else {
        6
    }
}

/// Which save a target rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SaveKind {
    Armour,
    Invulnerable,
    /// Neither save can succeed.
    Unsaveable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveSelection {
    pub threshold: u8,
    pub kind: SaveKind,
}

/// Picks between the modified armour save and an invulnerable save.
///
/// The invulnerable save is used when it is strictly better, or when the
/// armour save cannot succeed.
pub fn select_save(armour: u8, invulnerable: Option<u8>, config: &EngineConfig) -> SaveSelection {
    let armour_possible = !is_impossible(armour, config);
    let invulnerable = invulnerable
        .map(|v| clamp_threshold(i32::from(v), config))
        .filter(|v| !is_impossible(*v, config));

    match invulnerable {
        Some(inv) if !armour_possible || inv < armour => SaveSelection {
            threshold: inv,
            kind: SaveKind::Invulnerable,
        },
        _ if armour_possible => SaveSelection {
            threshold: armour,
            kind: SaveKind::Armour,
        },
        _ => SaveSelection {
            threshold: config.impossible_threshold(),
            kind: SaveKind::Unsaveable,
        },
    }
}

/// Outcome of a die against a threshold before any re-roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollTest {
    pub threshold: u8,
    pub critical_on: u8,
    impossible: bool,
}

impl RollTest {
    pub fn new(threshold: u8, critical_on: u8, config: &EngineConfig) -> Self {
        Self {
            threshold,
            critical_on,
            impossible: is_impossible(threshold, config),
        }
    }

    /// Tests that cannot produce criticals (saves, Feel No Pain).
    pub fn plain(threshold: u8, config: &EngineConfig) -> Self {
        Self::new(threshold, config.impossible_threshold(), config)
    }

    pub fn is_impossible(&self) -> bool {
        self.impossible
    }

    /// An impossible threshold fails every die, criticals included.
    pub fn succeeds(&self, face: u8) -> bool {
        !self.impossible && (face >= self.threshold || face >= self.critical_on)
    }

    pub fn is_critical(&self, face: u8) -> bool {
        !self.impossible && face >= self.critical_on
    }
}

/// Whether a die showing `face` is picked up by a re-roll of `kind`.
///
/// `All` also re-rolls non-critical successes when `fish` is set.
pub fn should_reroll(test: &RollTest, face: u8, kind: Option<RerollKind>, fish: bool) -> bool {
    let Some(kind) = kind else {
        return false;
    };
    let success = test.succeeds(face);
    match kind {
        RerollKind::Ones => face == 1,
        RerollKind::Failed => !success,
        RerollKind::All => !success || (fish && !test.is_critical(face)),
    }
}
