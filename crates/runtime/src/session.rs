//! Persistent battle state around individual resolutions.
//!
//! The engine only reads army state. [`BattleSession`] owns it, hands it to
//! each engagement, and writes back usage of limited rules once the resolution
//! has finished.

use wargame_core::rule::Phase;
use wargame_core::{
    ArmyFact, ArmyState, ChoiceSelection, CombatOptions, DiceSource, Engagement,
    EngagementOutcome, EngineConfig, Rule, Seat, Side, TurnKey, Unit, WeaponProfile,
};

use crate::error::Result;

/// One attack to resolve within the session's current turn and phase.
#[derive(Clone, Debug)]
pub struct Attack<'a> {
    pub attacker: &'a Unit,
    pub defender: &'a Unit,
    pub weapon: &'a WeaponProfile,
    pub attacker_rules: &'a [Rule],
    pub defender_rules: &'a [Rule],
    pub options: CombatOptions,
}

impl<'a> Attack<'a> {
    pub fn new(attacker: &'a Unit, defender: &'a Unit, weapon: &'a WeaponProfile) -> Self {
        Self {
            attacker,
            defender,
            weapon,
            attacker_rules: &[],
            defender_rules: &[],
            options: CombatOptions::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, attacker: &'a [Rule], defender: &'a [Rule]) -> Self {
        self.attacker_rules = attacker;
        self.defender_rules = defender;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: CombatOptions) -> Self {
        self.options = options;
        self
    }
}

/// Turn clock plus both armies' persistent state.
#[derive(Clone, Debug)]
pub struct BattleSession {
    turn: TurnKey,
    phase: Phase,
    first: ArmyState,
    second: ArmyState,
    config: EngineConfig,
}

impl Default for BattleSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BattleSession {
    /// Starts at the first player's command phase of round one.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            turn: TurnKey::new(1, Seat::First),
            phase: Phase::Command,
            first: ArmyState::new(),
            second: ArmyState::new(),
            config,
        }
    }

    #[must_use]
    pub fn with_armies(mut self, first: ArmyState, second: ArmyState) -> Self {
        self.first = first;
        self.second = second;
        self
    }

    pub fn turn(&self) -> TurnKey {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn army(&self, seat: Seat) -> &ArmyState {
        match seat {
            Seat::First => &self.first,
            Seat::Second => &self.second,
        }
    }

    fn army_mut(&mut self, seat: Seat) -> &mut ArmyState {
        match seat {
            Seat::First => &mut self.first,
            Seat::Second => &mut self.second,
        }
    }

    /// Jumps to `phase` within the current turn.
    pub fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.prune();
    }

    /// Moves to the next phase, rolling over into the next player turn after
    /// the fight phase. Expired facts are dropped.
    pub fn advance(&mut self) {
        match next_phase(self.phase) {
            Some(phase) => self.phase = phase,
            None => {
                self.turn = self.turn.next();
                self.phase = Phase::Command;
            }
        }
        tracing::debug!(turn = %self.turn, phase = %self.phase, "session advanced");
        self.prune();
    }

    fn prune(&mut self) {
        let (turn, phase) = (self.turn, self.phase);
        self.first.prune(turn, phase);
        self.second.prune(turn, phase);
    }

    pub fn add_fact(&mut self, seat: Seat, fact: ArmyFact) {
        let turn = self.turn;
        let fact = match fact.activated {
            Some(_) => fact,
            None => fact.activated_at(turn),
        };
        self.army_mut(seat).facts.push(fact);
    }

    /// Persists a per-turn or per-game choice made now.
    pub fn choose(&mut self, seat: Seat, rule: &str, option: &str) {
        let turn = self.turn;
        self.army_mut(seat)
            .choices
            .record(ChoiceSelection::new(rule, option, turn));
    }

    /// Resolves one attack in the current turn and phase, then records every
    /// limited rule that applied.
    pub fn engage<D>(&mut self, attack: Attack<'_>, dice: &mut D) -> Result<EngagementOutcome>
    where
        D: DiceSource + ?Sized,
    {
        let attacker_seat = attack.attacker.owner;
        let defender_seat = attack.defender.owner;

        let (outcome, used) = {
            let engagement = Engagement::builder()
                .attacker(attack.attacker)
                .defender(attack.defender)
                .weapon(attack.weapon)
                .phase(self.phase)
                .turn(self.turn)
                .armies(self.army(attacker_seat), self.army(defender_seat))
                .attacker_rules(attack.attacker_rules)
                .defender_rules(attack.defender_rules)
                .options(attack.options)
                .build()?;
            let outcome = engagement.resolve_with_config(dice, &self.config)?;
            let used = engagement.limited_activations(&outcome.selection);
            (outcome, used)
        };

        let turn = self.turn;
        for (side, rule) in used {
            let seat = match side {
                Side::Attacker => attacker_seat,
                Side::Defender => defender_seat,
            };
            tracing::debug!(%rule, ?seat, %turn, "limited rule used");
            self.army_mut(seat).activations.record(rule, turn);
        }

        tracing::info!(
            attacker = %attack.attacker.name,
            defender = %attack.defender.name,
            weapon = %attack.weapon.name,
            damage = outcome.result.summary.final_damage,
            "engagement resolved"
        );
        Ok(outcome)
    }
}

const fn next_phase(phase: Phase) -> Option<Phase> {
    match phase {
        Phase::Command => Some(Phase::Movement),
        Phase::Movement => Some(Phase::Shooting),
        Phase::Shooting => Some(Phase::Charge),
        Phase::Charge => Some(Phase::Fight),
        Phase::Fight => None,
    }
}
