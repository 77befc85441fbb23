//! Provenance-preserving modifier store.

use std::collections::BTreeMap;

use crate::rule::{RerollKind, RollPhase, RuleId};

use super::{Better, Combine, ModifierKey};

/// One contribution to a key, tagged with the rule that made it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierEntry {
    pub value: i32,
    pub source: RuleId,
}

/// Aggregate and provenance of one key, for display.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierLine {
    pub key: String,
    pub combine: Combine,
    pub value: i32,
    pub entries: Vec<ModifierEntry>,
}

/// Keyed store effects write into during one resolution.
///
/// Entries are append-only. Aggregates are recomputed on read, so the result
/// never depends on the order entries were added: sums commute, and each
/// extremum key always keeps its best value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifierAccumulator {
    slots: BTreeMap<ModifierKey, Vec<ModifierEntry>>,
}

impl ModifierAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an additive contribution.
    pub fn add(&mut self, key: ModifierKey, value: i32, source: RuleId) {
        if key.combine() != Combine::Sum {
            tracing::warn!(%key, value, %source, "additive write to an extremum key");
        }
        self.push(key, value, source);
    }

    /// Offers a candidate for an extremum key; the best candidate wins on read.
    pub fn set_extremum(&mut self, key: ModifierKey, value: i32, source: RuleId, better: Better) {
        if key.combine() != Combine::Extremum(better) {
            tracing::warn!(%key, value, %source, ?better, "extremum write disagrees with key");
        }
        self.push(key, value, source);
    }

    /// Writes `value` using the key's own combine rule.
    pub fn record(&mut self, key: ModifierKey, value: i32, source: RuleId) {
        match key.combine() {
            Combine::Sum => self.add(key, value, source),
            Combine::Extremum(better) => self.set_extremum(key, value, source, better),
        }
    }

    fn push(&mut self, key: ModifierKey, value: i32, source: RuleId) {
        tracing::trace!(%key, value, %source, "modifier recorded");
        self.slots
            .entry(key)
            .or_default()
            .push(ModifierEntry { value, source });
    }

    /// Aggregate of `key`: the sum, or the best value, or 0 when absent.
    pub fn get(&self, key: &ModifierKey) -> i32 {
        match key.combine() {
            Combine::Sum => self.entries(key).iter().map(|e| e.value).sum(),
            Combine::Extremum(_) => self.extremum(key).unwrap_or(0),
        }
    }

    /// Best value offered for an extremum key.
    pub fn extremum(&self, key: &ModifierKey) -> Option<i32> {
        let better = match key.combine() {
            Combine::Extremum(better) => better,
            Combine::Sum => return None,
        };
        self.entries(key)
            .iter()
            .map(|e| e.value)
            .reduce(|a, b| better.pick(a, b))
    }

    pub fn has(&self, key: &ModifierKey) -> bool {
        !self.entries(key).is_empty()
    }

    pub fn entries(&self, key: &ModifierKey) -> &[ModifierEntry] {
        self.slots.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &ModifierKey> {
        self.slots.keys()
    }

    /// Broadest re-roll granted for `phase`.
    pub fn reroll(&self, phase: RollPhase) -> Option<RerollKind> {
        [RerollKind::All, RerollKind::Failed, RerollKind::Ones]
            .into_iter()
            .find(|kind| self.has(&ModifierKey::Reroll(phase, *kind)))
    }

    /// Granted anti thresholds as `(keyword, threshold)`.
    pub fn anti(&self) -> impl Iterator<Item = (&str, i32)> + '_ {
        self.slots.iter().filter_map(|(key, _)| match key {
            ModifierKey::Anti(keyword) => Some((keyword.as_str(), self.get(key))),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every key with its aggregate and the rules behind it.
    pub fn explain(&self) -> Vec<ModifierLine> {
        self.slots
            .iter()
            .map(|(key, entries)| ModifierLine {
                key: key.to_string(),
                combine: key.combine(),
                value: self.get(key),
                entries: entries.clone(),
            })
            .collect()
    }
}
