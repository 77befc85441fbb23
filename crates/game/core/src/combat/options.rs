use crate::eval::ChoiceMap;

/// Situational facts the caller supplies for one resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatOptions {
    pub models_firing: u16,
    pub within_half_range: bool,
    pub charged: bool,
    pub remained_stationary: bool,
    pub in_cover: bool,
    /// Choice selections made for this resolution, by rule id.
    pub choices: ChoiceMap,
    /// Replaces the computed Blast bonus per model.
    pub blast_bonus: Option<u32>,
    /// `All` re-rolls also pick up successes that are not critical.
    pub fish_for_criticals: bool,
    /// Roll saves even when none can succeed.
    pub force_full_rolls: bool,
}

impl CombatOptions {
    pub fn new(models_firing: u16) -> Self {
        Self {
            models_firing,
            ..Self::default()
        }
    }
}

impl Default for CombatOptions {
    fn default() -> Self {
        Self {
            models_firing: 1,
            within_half_range: false,
            charged: false,
            remained_stationary: false,
            in_cover: false,
            choices: ChoiceMap::new(),
            blast_bonus: None,
            fish_for_criticals: false,
            force_full_rolls: false,
        }
    }
}
