//! Combat resolution state machine.
//!
//! Phases run strictly in order, each rolling one die per success of the
//! previous phase:
//!
//! 1. **Attacks**: attack characteristic per firing model, plus rapid fire and blast
//! 2. **Hit**: skill test; criticals may wound automatically or add extra hits
//! 3. **Wound**: strength against toughness; critical wounds may skip the save
//! 4. **Save**: armour or invulnerable save
//! 5. **Damage** and **Feel No Pain**: per-point mitigation of unsaved damage
//!
//! Every die is recorded, re-rolls included, so a [`CombatResult`] can be
//! replayed and displayed without re-running anything.

mod attacks;
mod damage;
mod hit;
mod options;
mod profile;
mod resolve;
mod result;
mod save;
pub mod threshold;
mod wound;

pub use options::CombatOptions;
pub use profile::{AntiThreshold, EffectiveTarget, EffectiveWeapon};
pub use resolve::{CombatModifiers, resolve_combat, resolve_combat_with_config};
pub use result::{CombatResult, CombatSummary, DieRoll, RollFlags, Step, StepNote, StepRecord};
pub use threshold::{SaveKind, SaveSelection};
