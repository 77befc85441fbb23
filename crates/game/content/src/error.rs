use std::path::PathBuf;

use wargame_core::{EngineError, ErrorSeverity, RuleId};

/// Content that cannot be turned into engine inputs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(RuleId),

    #[error("rule `{0}` is not in the catalog")]
    UnknownRule(RuleId),

    #[error("unsupported data file {} (expected .json or .ron)", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl EngineError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateRule(_) => "CONTENT_DUPLICATE_RULE",
            Self::UnknownRule(_) => "CONTENT_UNKNOWN_RULE",
            Self::UnsupportedFormat(_) => "CONTENT_UNSUPPORTED_FORMAT",
        }
    }
}
