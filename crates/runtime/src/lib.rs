//! The calling layer around the pure engine.
//!
//! Modules are organized by responsibility:
//! - [`dice`] adapts `rand` generators to the engine's dice source
//! - [`session`] owns persistent battle state and records rule usage after each
//!   resolution completes
//! - [`simulate`] runs many independent resolutions for damage statistics,
//!   optionally spread over blocking tokio tasks
pub mod dice;
pub mod error;
pub mod session;
pub mod simulate;

pub use dice::RandDice;
pub use error::{Result, RuntimeError};
pub use session::{Attack, BattleSession};
pub use simulate::{SimulationConfig, SimulationReport, Simulator};
