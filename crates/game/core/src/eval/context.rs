//! Per-resolution view over the pairing being evaluated.

use std::collections::BTreeMap;

use crate::rule::{Phase, RuleId, Subject};
use crate::state::{ArmyState, TurnKey, Unit, WeaponProfile};

/// Choice selections supplied for a single resolution, by rule.
pub type ChoiceMap = BTreeMap<RuleId, String>;

/// Which unit's rules a pass evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Side {
    Attacker,
    Defender,
}

/// Read-only inputs of one selection pass.
///
/// Built fresh per weapon/target pairing and side. `army` is the persistent
/// state of the side being evaluated only, so army-state atoms never see the
/// other side's facts.
#[derive(Clone, Copy, Debug)]
pub struct CombatContext<'a> {
    pub side: Side,
    pub attacker: &'a Unit,
    pub defender: &'a Unit,
    pub weapon: &'a WeaponProfile,
    pub phase: Phase,
    pub turn: TurnKey,
    pub army: &'a ArmyState,
    pub roll_choices: &'a ChoiceMap,
}

impl<'a> CombatContext<'a> {
    /// The unit whose rules are being evaluated.
    pub fn own_unit(&self) -> &'a Unit {
        match self.side {
            Side::Attacker => self.attacker,
            Side::Defender => self.defender,
        }
    }

    pub fn opponent_unit(&self) -> &'a Unit {
        match self.side {
            Side::Attacker => self.defender,
            Side::Defender => self.attacker,
        }
    }

    pub fn subject(&self, subject: Subject) -> &'a Unit {
        match subject {
            Subject::Own => self.own_unit(),
            Subject::Opponent => self.opponent_unit(),
        }
    }

    /// True when the turn being played belongs to the evaluated unit's player.
    pub fn is_own_turn(&self) -> bool {
        self.turn.player == self.own_unit().owner
    }
}
