//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and from the combat engine so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{CoreError, EngineError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("auto-tick requires a tick rate above zero")]
    InvalidTickRate,
}

impl RuntimeError {
    /// Severity of the underlying engine failure, if this is one.
    pub fn engine_severity(&self) -> Option<ErrorSeverity> {
        match self {
            RuntimeError::Engine(error) => Some(error.severity()),
            _ => None,
        }
    }

    pub fn as_engine(&self) -> Option<&EngineError> {
        match self {
            RuntimeError::Engine(error) => Some(error),
            _ => None,
        }
    }
}
