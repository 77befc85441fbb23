//! Units and their turn-scoped statuses.

use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::error::ResolveError;
use crate::rule::UnitAbility;
use crate::state::{Seat, TargetProfile, TurnKey};

/// Identifier of a unit within a battle.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Things a unit did (or suffered) during a turn.
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
pub enum UnitStatus {
    Moved,
    Advanced,
    FellBack,
    RemainedStationary,
    Charged,
    /// Arrived from reserves this turn.
    ArrivedFromReserves,
    BattleShocked,
    /// Below half starting strength.
    BelowHalfStrength,
    EngagedInMelee,
    HasShot,
    HasFought,
}

/// A status held over an inclusive window of turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRecord {
    pub status: UnitStatus,
    pub from: TurnKey,
    pub until: TurnKey,
}

impl StatusRecord {
    /// A status that only holds during `turn`.
    pub const fn this_turn(status: UnitStatus, turn: TurnKey) -> Self {
        Self {
            status,
            from: turn,
            until: turn,
        }
    }

    pub const fn spanning(status: UnitStatus, from: TurnKey, until: TurnKey) -> Self {
        Self {
            status,
            from,
            until,
        }
    }

    pub fn covers(&self, turn: TurnKey) -> bool {
        self.from <= turn && turn <= self.until
    }
}

/// Bounded status history of one unit.
///
/// Records are never pruned here; callers decide when old windows can be
/// dropped via [`UnitStatuses::retain_from`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStatuses {
    records: ArrayVec<StatusRecord, { EngineConfig::MAX_UNIT_STATUSES }>,
}

impl UnitStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record, widening an existing window for the same status when the
    /// two overlap or touch.
    pub fn insert(&mut self, unit: &str, record: StatusRecord) -> Result<(), ResolveError> {
        if let Some(existing) = self.records.iter_mut().find(|r| {
            r.status == record.status
                && r.from <= record.until.next()
                && record.from <= r.until.next()
        }) {
            existing.from = existing.from.min(record.from);
            existing.until = existing.until.max(record.until);
            return Ok(());
        }

        self.records
            .try_push(record)
            .map_err(|_| ResolveError::TooManyStatuses {
                unit: unit.to_string(),
                max: EngineConfig::MAX_UNIT_STATUSES,
            })
    }

    /// True when `status` has a record whose window includes `turn`.
    pub fn active(&self, status: UnitStatus, turn: TurnKey) -> bool {
        self.records
            .iter()
            .any(|r| r.status == status && r.covers(turn))
    }

    /// Drops every record that ended before `turn`.
    pub fn retain_from(&mut self, turn: TurnKey) {
        self.records.retain(|r| r.until >= turn);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A unit on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub owner: Seat,
    /// Models still alive.
    pub models: u16,
    pub toughness: u8,
    pub save: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub invulnerable: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub feel_no_pain: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub keywords: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<UnitAbility>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: UnitStatuses,
    /// Unit this one is attached to as a leader.
    #[cfg_attr(feature = "serde", serde(default))]
    pub leading: Option<UnitId>,
}

impl Unit {
    pub fn new(id: impl Into<String>, owner: Seat, models: u16, toughness: u8, save: u8) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: UnitId(id),
            owner,
            models,
            toughness,
            save,
            invulnerable: None,
            feel_no_pain: None,
            keywords: Vec::new(),
            abilities: Vec::new(),
            statuses: UnitStatuses::new(),
            leading: None,
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: UnitAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_invulnerable(mut self, threshold: u8) -> Self {
        self.invulnerable = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_feel_no_pain(mut self, threshold: u8) -> Self {
        self.feel_no_pain = Some(threshold);
        self
    }

    /// Records `status` for the single turn `turn`.
    pub fn mark(&mut self, status: UnitStatus, turn: TurnKey) -> Result<(), ResolveError> {
        let id = self.id.0.clone();
        self.statuses
            .insert(&id, StatusRecord::this_turn(status, turn))
    }

    /// Keyword match, case-insensitive.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }

    pub fn has_status(&self, status: UnitStatus, turn: TurnKey) -> bool {
        self.statuses.active(status, turn)
    }

    pub fn is_leading(&self) -> bool {
        self.leading.is_some()
    }

    /// Defensive profile of this unit as a target.
    pub fn target_profile(&self) -> TargetProfile {
        TargetProfile {
            name: self.name.clone(),
            toughness: self.toughness,
            save: self.save,
            invulnerable: self.invulnerable,
            feel_no_pain: self.feel_no_pain,
            models: self.models,
            keywords: self.keywords.clone(),
            abilities: self.abilities.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R1P1: TurnKey = TurnKey::new(1, Seat::First);
    const R1P2: TurnKey = TurnKey::new(1, Seat::Second);
    const R2P1: TurnKey = TurnKey::new(2, Seat::First);

    #[test]
    fn status_only_holds_inside_its_window() {
        let mut unit = Unit::new("intercessors", Seat::First, 5, 4, 3);
        unit.mark(UnitStatus::Charged, R1P1).unwrap();

        assert!(unit.has_status(UnitStatus::Charged, R1P1));
        // Same round, other player's turn.
        assert!(!unit.has_status(UnitStatus::Charged, R1P2));
        assert!(!unit.has_status(UnitStatus::Charged, R2P1));
    }

    #[test]
    fn adjacent_windows_merge() {
        let mut statuses = UnitStatuses::new();
        statuses
            .insert("u", StatusRecord::this_turn(UnitStatus::BattleShocked, R1P1))
            .unwrap();
        statuses
            .insert("u", StatusRecord::this_turn(UnitStatus::BattleShocked, R1P2))
            .unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses.active(UnitStatus::BattleShocked, R1P2));
    }

    #[test]
    fn full_history_is_rejected() {
        let mut statuses = UnitStatuses::new();
        let mut turn = R1P1;
        for _ in 0..EngineConfig::MAX_UNIT_STATUSES {
            statuses
                .insert("u", StatusRecord::this_turn(UnitStatus::Moved, turn))
                .unwrap();
            // Skip a turn so windows never touch.
            turn = turn.next().next();
        }
        let err = statuses
            .insert("u", StatusRecord::this_turn(UnitStatus::Moved, turn))
            .unwrap_err();
        assert!(matches!(err, ResolveError::TooManyStatuses { max, .. } if max == 8));
    }

    #[test]
    fn retain_from_drops_finished_windows() {
        let mut statuses = UnitStatuses::new();
        statuses
            .insert("u", StatusRecord::this_turn(UnitStatus::Advanced, R1P1))
            .unwrap();
        statuses
            .insert("u", StatusRecord::this_turn(UnitStatus::Charged, R2P1))
            .unwrap();
        statuses.retain_from(R2P1);
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let unit = Unit::new("tank", Seat::Second, 1, 10, 3).with_keywords(["Vehicle"]);
        assert!(unit.has_keyword("VEHICLE"));
        assert!(!unit.has_keyword("infantry"));
    }
}
