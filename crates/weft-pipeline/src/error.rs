//! Pipeline error types.

use std::time::Duration;

use thiserror::Error;
use weft_codegen::CodegenError;
use weft_core::CoreError;
use weft_dispatch::DispatchError;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that abort a generation session.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The design document is absent or unusable.
    #[error("Invalid design input: {0}")]
    InvalidInput(String),

    /// The dispatcher failed where no local fallback exists.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// The framework adapter failed.
    #[error("Framework adaptation failed for {framework}: {message}")]
    Adaptation { framework: String, message: String },

    /// The pattern analyzer failed.
    #[error("Pattern analysis failed: {0}")]
    Analysis(String),

    /// Any other code generation failure.
    #[error("Code generation failed: {0}")]
    Codegen(CodegenError),

    /// The cache store failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Input or configuration could not be loaded.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A collaborator call exceeded its deadline.
    #[error("{collaborator} did not respond within {after:?}")]
    CollaboratorTimeout {
        collaborator: &'static str,
        after: Duration,
    },
}

impl From<CodegenError> for PipelineError {
    fn from(err: CodegenError) -> Self {
        match err {
            CodegenError::Adaptation { framework, message } => {
                Self::Adaptation { framework, message }
            }
            CodegenError::Analysis(message) => Self::Analysis(message),
            CodegenError::Dispatch(err) => Self::Dispatch(err),
            other => Self::Codegen(other),
        }
    }
}
