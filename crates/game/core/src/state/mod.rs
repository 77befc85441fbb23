//! Battle state read during evaluation.
//!
//! Units, weapon and target profiles, turn identifiers and army-wide
//! persistent facts. Resolution borrows all of it immutably.

mod army;
mod profile;
mod turn;
mod unit;

pub use army::{
    Activation, ActivationLedger, ArmyFact, ArmyState, ChoiceSelection, ChoiceSelections, Expiry,
};
pub use profile::{TargetProfile, WeaponProfile, WeaponRange};
pub use turn::{Seat, TurnKey};
pub use unit::{StatusRecord, Unit, UnitId, UnitStatus, UnitStatuses};
