//! Common error infrastructure for wargame-core.
//!
//! Only precondition violations are errors. Malformed rule content never
//! aborts evaluation: it fails closed and is reported through
//! [`crate::eval::Diagnostic`] records instead.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each concern has its own error enum with specific variants
//! - **Rejected Early**: Impossible game states are refused before any die is rolled
//! - **Severity Classification**: Errors are categorized so callers can map them to messages

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: no weapon selected, zero firing models
    Validation,

    /// Unexpected state inconsistency. Indicates a bug in the caller or engine.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all wargame-core errors.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A resolution rejected before it starts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no attacking unit selected")]
    MissingAttacker,

    #[error("no weapon selected")]
    MissingWeapon,

    #[error("no target selected")]
    MissingTarget,

    #[error("no models are firing")]
    NoFiringModels,

    #[error("target unit `{0}` has no models left")]
    EmptyTarget(String),

    #[error("profile `{profile}` has invalid {field} ({value})")]
    InvalidProfile {
        profile: String,
        field: &'static str,
        value: i32,
    },

    #[error("unit `{unit}` cannot hold more than {max} statuses")]
    TooManyStatuses { unit: String, max: usize },
}

impl EngineError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TooManyStatuses { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAttacker => "MISSING_ATTACKER",
            Self::MissingWeapon => "MISSING_WEAPON",
            Self::MissingTarget => "MISSING_TARGET",
            Self::NoFiringModels => "NO_FIRING_MODELS",
            Self::EmptyTarget(_) => "EMPTY_TARGET",
            Self::InvalidProfile { .. } => "INVALID_PROFILE",
            Self::TooManyStatuses { .. } => "TOO_MANY_STATUSES",
        }
    }
}

impl EngineError for crate::dice::DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "INVALID_DICE"
    }
}
