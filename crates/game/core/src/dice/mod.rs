//! Dice sources and dice-valued characteristics.
//!
//! Randomness is the only external dependency of a resolution. It is injected
//! through [`DiceSource`] so a resolution owns its own stream and two
//! resolutions never share mutable state.

mod expr;
mod source;

pub use expr::{DiceError, DiceExpr, DiceRoll};
pub use source::{DiceSource, FixedDice, PcgDice, ScriptedDice, mix_seed};
