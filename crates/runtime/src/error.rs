//! Unified error types surfaced by the runtime API.
use thiserror::Error;
use wargame_core::{EngineError, ErrorSeverity, ResolveError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("simulation needs at least one trial")]
    NoTrials,

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl EngineError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Resolve(e) => e.severity(),
            Self::NoTrials => ErrorSeverity::Validation,
            Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Resolve(e) => e.error_code(),
            Self::NoTrials => "RUNTIME_NO_TRIALS",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}
