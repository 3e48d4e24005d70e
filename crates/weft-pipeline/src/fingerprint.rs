//! Cache keys.

use sha2::{Digest, Sha256};
use weft_core::{DesignDocument, GenerationConfig};

use crate::error::{PipelineError, Result};

/// Hex SHA-256 over the document identity and the serialized config.
pub fn fingerprint(document: &DesignDocument, config: &GenerationConfig) -> Result<String> {
    let config_bytes = serde_json::to_vec(config)
        .map_err(|e| PipelineError::Cache(format!("config is not serializable: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(document.identity_bytes());
    hasher.update([0u8]);
    hasher.update(config_bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
