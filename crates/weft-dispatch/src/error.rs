//! Dispatch error types.

use std::time::Duration;

use thiserror::Error;

use crate::task::TaskKind;

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors surfaced to callers of the dispatcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The background worker could not be started.
    #[error("Dispatcher failed to start: {0}")]
    Init(String),

    /// The task did not complete before its deadline.
    #[error("Task {id} ({kind}) timed out after {after:?}")]
    Timeout {
        id: u64,
        kind: TaskKind,
        after: Duration,
    },

    /// The handler reported a failure.
    #[error("Task {id} ({kind}) failed: {message}")]
    TaskFailed {
        id: u64,
        kind: TaskKind,
        message: String,
    },

    /// The worker has shut down.
    #[error("Dispatcher is closed")]
    Closed,

    /// The handler answered with an output of the wrong kind.
    #[error("Unexpected output for {expected} task: got {got}")]
    UnexpectedOutput { expected: TaskKind, got: &'static str },
}

impl DispatchError {
    /// Whether this error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
