//! Data-driven content for the wargame engine.
//!
//! This crate is the engine's external content source:
//! - Rule catalogs (JSON or RON)
//! - Attack scenarios (JSON or RON)
//! - Engine tables (TOML)
//! - Structural validation of rule content, which the engine itself never
//!   performs
//!
//! All loaders use wargame-core types directly with serde.

mod error;
pub mod validate;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use error::ContentError;
pub use validate::{IssueKind, ValidationIssue, validate_rule, validate_rules};

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, Format, LoadResult, LoadedScenario, RuleCatalog,
    Scenario, ScenarioLoader,
};
