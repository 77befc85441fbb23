//! Trigger metadata: when a rule is even considered.

/// Game phase in which a resolution happens.
///
/// Declaration order is turn order, so `Ord` compares phases within a turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Phase {
    Command,
    Movement,
    Shooting,
    Charge,
    Fight,
}

/// Phases a rule listens to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PhaseSet {
    #[default]
    Any,
    Only(Vec<Phase>),
}

impl PhaseSet {
    pub fn contains(&self, phase: Phase) -> bool {
        match self {
            Self::Any => true,
            Self::Only(phases) => phases.contains(&phase),
        }
    }
}

/// Whose turn a rule may apply in, relative to the unit that owns the rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TurnFilter {
    Own,
    Opponent,
    #[default]
    Either,
}

impl TurnFilter {
    pub const fn admits(&self, own_turn: bool) -> bool {
        match self {
            Self::Own => own_turn,
            Self::Opponent => !own_turn,
            Self::Either => true,
        }
    }
}

/// How often a rule may be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ActivationLimit {
    #[default]
    Unlimited,
    OncePerTurn,
    OncePerBattle,
}

impl ActivationLimit {
    pub const fn is_limited(&self) -> bool {
        !matches!(self, Self::Unlimited)
    }
}

/// Phase, turn-ownership and usage filters checked before a rule's condition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Trigger {
    pub phases: PhaseSet,
    pub turn: TurnFilter,
    pub limit: ActivationLimit,
}

impl Trigger {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn in_phases(phases: impl IntoIterator<Item = Phase>) -> Self {
        Self {
            phases: PhaseSet::Only(phases.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_turn(mut self, turn: TurnFilter) -> Self {
        self.turn = turn;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: ActivationLimit) -> Self {
        self.limit = limit;
        self
    }
}
