/// Engine tables and tunable limits.
///
/// The defaults describe the standard six-sided tables. Content packs may load a
/// different table set, but every resolution reads the same config for its whole
/// lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Faces on every die rolled during resolution.
    pub die_sides: u8,
    /// Lowest success threshold any roll can reach (a natural 1 always fails).
    pub min_threshold: u8,
    /// Largest net bonus or penalty applied to hit and wound rolls.
    pub roll_modifier_cap: i32,
    /// Largest total improvement applied to an armour save.
    pub save_improvement_cap: i32,
    /// Target models per additional Blast attack.
    pub blast_divisor: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_UNIT_STATUSES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DIE_SIDES: u8 = 6;
    pub const DEFAULT_MIN_THRESHOLD: u8 = 2;
    pub const DEFAULT_ROLL_MODIFIER_CAP: i32 = 1;
    pub const DEFAULT_SAVE_IMPROVEMENT_CAP: i32 = 1;
    pub const DEFAULT_BLAST_DIVISOR: u32 = 5;

    // ===== bounds on loaded tables =====
    /// Largest die whose impossible threshold still fits in a `u8`.
    pub const MAX_DIE_SIDES: u8 = u8::MAX - 1;
    /// A natural 1 always fails, so no table may make it a success.
    pub const LOWEST_MIN_THRESHOLD: u8 = 2;

    pub fn new() -> Self {
        Self {
            die_sides: Self::DEFAULT_DIE_SIDES,
            min_threshold: Self::DEFAULT_MIN_THRESHOLD,
            roll_modifier_cap: Self::DEFAULT_ROLL_MODIFIER_CAP,
            save_improvement_cap: Self::DEFAULT_SAVE_IMPROVEMENT_CAP,
            blast_divisor: Self::DEFAULT_BLAST_DIVISOR,
        }
    }

    /// Threshold that no roll can meet: one above the highest face.
    pub const fn impossible_threshold(&self) -> u8 {
        self.die_sides.saturating_add(1)
    }

    /// Unmodified roll that is always a critical.
    pub const fn natural_critical(&self) -> u8 {
        self.die_sides
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impossible_threshold_saturates_on_the_largest_die() {
        let config = EngineConfig {
            die_sides: u8::MAX,
            ..EngineConfig::default()
        };
        assert_eq!(config.impossible_threshold(), u8::MAX);
        assert_eq!(EngineConfig::default().impossible_threshold(), 7);
    }
}
