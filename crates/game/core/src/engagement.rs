//! One weapon/target pairing: both selection passes followed by resolution.

use crate::combat::{CombatModifiers, CombatOptions, CombatResult, resolve_combat_with_config};
use crate::config::EngineConfig;
use crate::dice::DiceSource;
use crate::error::ResolveError;
use crate::eval::{CombatContext, Selection, Side, select_applicable_rules};
use crate::rule::{Phase, Rule, RuleId};
use crate::state::{ArmyState, TurnKey, Unit, UnitStatus, WeaponProfile};

static EMPTY_ARMY: ArmyState = ArmyState::EMPTY;

/// Everything needed to evaluate and resolve one attack.
#[derive(Clone, Debug)]
pub struct Engagement<'a> {
    pub attacker: &'a Unit,
    pub defender: &'a Unit,
    pub weapon: &'a WeaponProfile,
    pub phase: Phase,
    pub turn: TurnKey,
    pub attacker_army: &'a ArmyState,
    pub defender_army: &'a ArmyState,
    pub attacker_rules: &'a [Rule],
    pub defender_rules: &'a [Rule],
    pub options: CombatOptions,
}

/// Both sides' selections.
#[derive(Clone, Debug)]
pub struct EngagementSelection {
    pub attacker: Selection,
    pub defender: Selection,
}

impl EngagementSelection {
    pub fn selection(&self, side: Side) -> &Selection {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngagementOutcome {
    pub selection: EngagementSelection,
    pub result: CombatResult,
}

impl<'a> Engagement<'a> {
    pub fn builder() -> EngagementBuilder<'a> {
        EngagementBuilder::default()
    }

    pub fn context(&self, side: Side) -> CombatContext<'_> {
        CombatContext {
            side,
            attacker: self.attacker,
            defender: self.defender,
            weapon: self.weapon,
            phase: self.phase,
            turn: self.turn,
            army: match side {
                Side::Attacker => self.attacker_army,
                Side::Defender => self.defender_army,
            },
            roll_choices: &self.options.choices,
        }
    }

    /// Runs the attacker and defender passes independently.
    pub fn select(&self) -> EngagementSelection {
        EngagementSelection {
            attacker: select_applicable_rules(self.attacker_rules, &self.context(Side::Attacker)),
            defender: select_applicable_rules(self.defender_rules, &self.context(Side::Defender)),
        }
    }

    /// Situational flags, filled in from the attacker's statuses this turn.
    pub fn effective_options(&self) -> CombatOptions {
        let mut options = self.options.clone();
        options.charged |= self.attacker.has_status(UnitStatus::Charged, self.turn);
        options.remained_stationary |= self
            .attacker
            .has_status(UnitStatus::RemainedStationary, self.turn);
        options
    }

    pub fn resolve<D>(&self, dice: &mut D) -> Result<EngagementOutcome, ResolveError>
    where
        D: DiceSource + ?Sized,
    {
        self.resolve_with_config(dice, &EngineConfig::default())
    }

    pub fn resolve_with_config<D>(
        &self,
        dice: &mut D,
        config: &EngineConfig,
    ) -> Result<EngagementOutcome, ResolveError>
    where
        D: DiceSource + ?Sized,
    {
        let selection = self.select();
        let modifiers = CombatModifiers::new(
            selection.attacker.modifiers.clone(),
            selection.defender.modifiers.clone(),
        );
        let result = resolve_combat_with_config(
            self.weapon,
            &self.defender.target_profile(),
            &self.effective_options(),
            &modifiers,
            dice,
            config,
        )?;
        Ok(EngagementOutcome { selection, result })
    }

    /// Applied rules that carry a usage limit, by side.
    pub fn limited_activations(&self, selection: &EngagementSelection) -> Vec<(Side, RuleId)> {
        let mut used = Vec::new();
        for (side, rules) in [
            (Side::Attacker, self.attacker_rules),
            (Side::Defender, self.defender_rules),
        ] {
            for applied in &selection.selection(side).applied {
                let limited = rules
                    .iter()
                    .any(|r| r.id == applied.id && r.trigger.limit.is_limited());
                if limited {
                    used.push((side, applied.id.clone()));
                }
            }
        }
        used
    }
}

/// Collects an [`Engagement`], rejecting missing participants.
#[derive(Clone, Debug, Default)]
pub struct EngagementBuilder<'a> {
    attacker: Option<&'a Unit>,
    defender: Option<&'a Unit>,
    weapon: Option<&'a WeaponProfile>,
    phase: Option<Phase>,
    turn: Option<TurnKey>,
    attacker_army: Option<&'a ArmyState>,
    defender_army: Option<&'a ArmyState>,
    attacker_rules: &'a [Rule],
    defender_rules: &'a [Rule],
    options: CombatOptions,
}

impl<'a> EngagementBuilder<'a> {
    pub fn attacker(mut self, unit: &'a Unit) -> Self {
        self.attacker = Some(unit);
        self
    }

    pub fn defender(mut self, unit: &'a Unit) -> Self {
        self.defender = Some(unit);
        self
    }

    pub fn weapon(mut self, weapon: &'a WeaponProfile) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn turn(mut self, turn: TurnKey) -> Self {
        self.turn = Some(turn);
        self
    }

    pub fn armies(mut self, attacker: &'a ArmyState, defender: &'a ArmyState) -> Self {
        self.attacker_army = Some(attacker);
        self.defender_army = Some(defender);
        self
    }

    pub fn attacker_rules(mut self, rules: &'a [Rule]) -> Self {
        self.attacker_rules = rules;
        self
    }

    pub fn defender_rules(mut self, rules: &'a [Rule]) -> Self {
        self.defender_rules = rules;
        self
    }

    pub fn options(mut self, options: CombatOptions) -> Self {
        self.options = options;
        self
    }

    /// Phase defaults to shooting (fight for melee weapons) and the turn to
    /// the attacker's first.
    pub fn build(self) -> Result<Engagement<'a>, ResolveError> {
        let attacker = self.attacker.ok_or(ResolveError::MissingAttacker)?;
        let weapon = self.weapon.ok_or(ResolveError::MissingWeapon)?;
        let defender = self.defender.ok_or(ResolveError::MissingTarget)?;

        let phase = self.phase.unwrap_or(if weapon.range.is_ranged() {
            Phase::Shooting
        } else {
            Phase::Fight
        });

        Ok(Engagement {
            attacker,
            defender,
            weapon,
            phase,
            turn: self.turn.unwrap_or(TurnKey::new(1, attacker.owner)),
            attacker_army: self.attacker_army.unwrap_or(&EMPTY_ARMY),
            defender_army: self.defender_army.unwrap_or(&EMPTY_ARMY),
            attacker_rules: self.attacker_rules,
            defender_rules: self.defender_rules,
            options: self.options,
        })
    }
}
