//! Error types for code generation.

use thiserror::Error;
use weft_dispatch::DispatchError;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// The framework adapter failed.
    #[error("Framework adaptation failed for {framework}: {message}")]
    Adaptation { framework: String, message: String },

    /// The pattern analyzer failed.
    #[error("Pattern analysis failed: {0}")]
    Analysis(String),

    /// A dispatched task failed where no local fallback exists.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl CodegenError {
    pub fn adaptation(framework: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adaptation {
            framework: framework.into(),
            message: message.into(),
        }
    }
}
