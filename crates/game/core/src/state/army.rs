//! Army-wide persistent state.
//!
//! Facts, standing choice selections and the activation ledger outlive any
//! single resolution. The engine only ever reads them; the calling layer
//! mutates them between resolutions.

use crate::rule::{ActivationLimit, ChoiceLifetime, Phase, RuleId};
use crate::state::TurnKey;

/// End of a fact's lifetime: the fact is live up to and including `phase` of
/// `turn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expiry {
    pub turn: TurnKey,
    pub phase: Phase,
}

/// A durable key-value fact (e.g. an activated battle-wide bonus).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmyFact {
    pub key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<String>,
    /// First turn the fact applies; `None` means it always has.
    #[cfg_attr(feature = "serde", serde(default))]
    pub activated: Option<TurnKey>,
    /// `None` means it never expires.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires: Option<Expiry>,
}

impl ArmyFact {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            activated: None,
            expires: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn activated_at(mut self, turn: TurnKey) -> Self {
        self.activated = Some(turn);
        self
    }

    #[must_use]
    pub fn expiring(mut self, turn: TurnKey, phase: Phase) -> Self {
        self.expires = Some(Expiry { turn, phase });
        self
    }

    pub fn is_live(&self, turn: TurnKey, phase: Phase) -> bool {
        let started = self.activated.is_none_or(|from| from <= turn);
        let not_expired = self
            .expires
            .is_none_or(|end| (turn, phase) <= (end.turn, end.phase));
        started && not_expired
    }

    fn matches(&self, key: &str, value: Option<&str>) -> bool {
        if !self.key.eq_ignore_ascii_case(key) {
            return false;
        }
        match value {
            None => true,
            Some(wanted) => self
                .value
                .as_deref()
                .is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// A standing selection for a choice rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceSelection {
    pub rule: RuleId,
    pub option: String,
    pub made_at: TurnKey,
}

impl ChoiceSelection {
    pub fn new(rule: impl Into<String>, option: impl Into<String>, made_at: TurnKey) -> Self {
        Self {
            rule: RuleId::new(rule),
            option: option.into(),
            made_at,
        }
    }
}

/// Persistent choice selections, newest last.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ChoiceSelections(Vec<ChoiceSelection>);

impl ChoiceSelections {
    pub const EMPTY: Self = Self(Vec::new());

    pub fn record(&mut self, selection: ChoiceSelection) {
        self.0.push(selection);
    }

    /// The selection still valid for `rule` at `turn` under `lifetime`.
    ///
    /// Per-roll choices are never persisted, so they always return `None`.
    pub fn current(
        &self,
        rule: &RuleId,
        lifetime: ChoiceLifetime,
        turn: TurnKey,
    ) -> Option<&ChoiceSelection> {
        let mut candidates = self.0.iter().rev().filter(|s| &s.rule == rule);
        match lifetime {
            ChoiceLifetime::PerRoll => None,
            ChoiceLifetime::PerTurn => candidates.find(|s| s.made_at == turn),
            ChoiceLifetime::PerGame => candidates.find(|s| s.made_at <= turn),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChoiceSelection> {
        self.0.iter()
    }
}

/// One recorded use of a limited rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activation {
    pub rule: RuleId,
    pub turn: TurnKey,
}

/// Record of once-per-turn / once-per-battle usage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ActivationLedger(Vec<Activation>);

impl ActivationLedger {
    pub const EMPTY: Self = Self(Vec::new());

    pub fn record(&mut self, rule: RuleId, turn: TurnKey) {
        self.0.push(Activation { rule, turn });
    }

    pub fn used_this_turn(&self, rule: &RuleId, turn: TurnKey) -> bool {
        self.0.iter().any(|a| &a.rule == rule && a.turn == turn)
    }

    pub fn used_ever(&self, rule: &RuleId) -> bool {
        self.0.iter().any(|a| &a.rule == rule)
    }

    /// True when `limit` still allows `rule` to be used at `turn`.
    pub fn permits(&self, rule: &RuleId, limit: ActivationLimit, turn: TurnKey) -> bool {
        match limit {
            ActivationLimit::Unlimited => true,
            ActivationLimit::OncePerTurn => !self.used_this_turn(rule, turn),
            ActivationLimit::OncePerBattle => !self.used_ever(rule),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything one side carries between resolutions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ArmyState {
    pub facts: Vec<ArmyFact>,
    pub choices: ChoiceSelections,
    pub activations: ActivationLedger,
}

impl ArmyState {
    pub const EMPTY: Self = Self {
        facts: Vec::new(),
        choices: ChoiceSelections::EMPTY,
        activations: ActivationLedger::EMPTY,
    };

    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fact(mut self, fact: ArmyFact) -> Self {
        self.facts.push(fact);
        self
    }

    /// True when a live fact matches `key` (and `value`, when given).
    pub fn is_live(&self, key: &str, value: Option<&str>, turn: TurnKey, phase: Phase) -> bool {
        self.facts
            .iter()
            .any(|f| f.matches(key, value) && f.is_live(turn, phase))
    }

    /// Forgets facts that can never be live again.
    pub fn prune(&mut self, turn: TurnKey, phase: Phase) {
        self.facts.retain(|f| {
            f.expires
                .is_none_or(|end| (turn, phase) <= (end.turn, end.phase))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Seat;

    const R1P1: TurnKey = TurnKey::new(1, Seat::First);
    const R1P2: TurnKey = TurnKey::new(1, Seat::Second);
    const R2P1: TurnKey = TurnKey::new(2, Seat::First);

    #[test]
    fn fact_lives_between_activation_and_expiry() {
        let fact = ArmyFact::new("waaagh")
            .activated_at(R1P2)
            .expiring(R1P2, Phase::Fight);
        assert!(!fact.is_live(R1P1, Phase::Shooting));
        assert!(fact.is_live(R1P2, Phase::Command));
        assert!(fact.is_live(R1P2, Phase::Fight));
        assert!(!fact.is_live(R2P1, Phase::Command));
    }

    #[test]
    fn fact_value_must_match_when_asked() {
        let army = ArmyState::new().with_fact(ArmyFact::new("doctrine").with_value("devastator"));
        assert!(army.is_live("doctrine", None, R1P1, Phase::Shooting));
        assert!(army.is_live("Doctrine", Some("DEVASTATOR"), R1P1, Phase::Shooting));
        assert!(!army.is_live("doctrine", Some("assault"), R1P1, Phase::Shooting));
    }

    #[test]
    fn choice_lifetimes() {
        let mut choices = ChoiceSelections::default();
        choices.record(ChoiceSelection::new("oath", "target-a", R1P1));
        let oath = RuleId::new("oath");

        assert!(choices.current(&oath, ChoiceLifetime::PerRoll, R1P1).is_none());
        assert!(choices.current(&oath, ChoiceLifetime::PerTurn, R1P1).is_some());
        assert!(choices.current(&oath, ChoiceLifetime::PerTurn, R1P2).is_none());
        assert_eq!(
            choices
                .current(&oath, ChoiceLifetime::PerGame, R2P1)
                .map(|s| s.option.as_str()),
            Some("target-a")
        );
    }

    #[test]
    fn newest_selection_wins() {
        let mut choices = ChoiceSelections::default();
        choices.record(ChoiceSelection::new("stance", "a", R1P1));
        choices.record(ChoiceSelection::new("stance", "b", R1P1));
        let found = choices
            .current(&RuleId::new("stance"), ChoiceLifetime::PerTurn, R1P1)
            .unwrap();
        assert_eq!(found.option, "b");
    }

    #[test]
    fn ledger_enforces_limits() {
        let mut ledger = ActivationLedger::default();
        let rule = RuleId::new("strat");
        assert!(ledger.permits(&rule, ActivationLimit::OncePerBattle, R1P1));

        ledger.record(rule.clone(), R1P1);
        assert!(!ledger.permits(&rule, ActivationLimit::OncePerTurn, R1P1));
        assert!(ledger.permits(&rule, ActivationLimit::OncePerTurn, R1P2));
        assert!(!ledger.permits(&rule, ActivationLimit::OncePerBattle, R2P1));
        assert!(ledger.permits(&rule, ActivationLimit::Unlimited, R1P1));
    }

    #[test]
    fn prune_drops_expired_facts() {
        let mut army = ArmyState::new()
            .with_fact(ArmyFact::new("short").expiring(R1P1, Phase::Shooting))
            .with_fact(ArmyFact::new("forever"));
        army.prune(R1P2, Phase::Command);
        assert_eq!(army.facts.len(), 1);
        assert_eq!(army.facts[0].key, "forever");
    }
}
