//! Error types shared by the pipeline crates.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while loading inputs or configuration.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The design document is structurally unusable.
    #[error("Invalid design input: {0}")]
    InvalidInput(String),

    /// The generation configuration is rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
