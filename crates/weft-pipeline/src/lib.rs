//! Generation orchestration for weft.
//!
//! The [`Orchestrator`] runs one session per request through the fixed
//! phase order: analyzing, planning, synthesizing, adapting, assessing,
//! optimizing and assembling. Results are cached by a fingerprint of the
//! design document and configuration.
//!
//! # Example
//!
//! ```ignore
//! use weft_pipeline::{Orchestrator, OrchestratorOptions};
//!
//! let orchestrator = Orchestrator::new(OrchestratorOptions::default())?;
//! let artifact = orchestrator.generate(&document, &config).await?;
//! println!("{:?}: {} files", artifact.build_status, artifact.files.len());
//! ```

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod orchestrator;
pub mod progress;
pub mod session;

pub use cache::{CacheStore, MemoryCache};
pub use error::{PipelineError, Result};
pub use fingerprint::fingerprint;
pub use orchestrator::{Orchestrator, OrchestratorOptions};
pub use progress::{NoProgress, ProgressReporter};
pub use session::{ActiveSessions, SessionHandle, SessionPhase};
