//! Result cache keyed by fingerprint.
//!
//! Entries are created once and never updated. Two sessions racing on the
//! same fingerprint may both compute a result; the first insert wins and
//! the second is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use weft_core::GeneratedArtifact;

use crate::error::Result;

/// Shared store of generated artifacts.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, fingerprint: &str) -> Result<Option<GeneratedArtifact>>;

    /// Store `artifact` unless the fingerprint is already present.
    async fn set(&self, fingerprint: &str, artifact: &GeneratedArtifact) -> Result<()>;
}

/// In-process [`CacheStore`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, GeneratedArtifact>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, fingerprint: &str) -> Result<Option<GeneratedArtifact>> {
        Ok(self.entries.read().get(fingerprint).cloned())
    }

    async fn set(&self, fingerprint: &str, artifact: &GeneratedArtifact) -> Result<()> {
        self.entries
            .write()
            .entry(fingerprint.to_string())
            .or_insert_with(|| artifact.clone());
        Ok(())
    }
}
