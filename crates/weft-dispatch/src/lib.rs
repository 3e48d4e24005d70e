//! Background task dispatch.
//!
//! A [`Dispatcher`] owns one worker thread that runs a [`TaskHandler`]
//! serially. Callers submit typed [`TaskRequest`]s from async code and await
//! the matching [`TaskOutput`]. Replies are correlated by a per-submission
//! ID so any number of sessions can share one dispatcher.
//!
//! Every submission has a deadline. On expiry the pending entry is evicted
//! and the caller receives [`DispatchError::Timeout`]; a reply that arrives
//! afterwards is discarded. A failing or panicking task is reported to its
//! caller only and the worker keeps serving.
//!
//! # Example
//!
//! ```ignore
//! use weft_dispatch::{Dispatcher, TaskRequest};
//!
//! let dispatcher = Dispatcher::spawn(handler)?;
//! let report = dispatcher.validate("export const a = 1;").await?;
//! ```

pub mod dispatcher;
pub mod error;
pub mod task;

pub use dispatcher::{Dispatcher, DEFAULT_TIMEOUT};
pub use error::{DispatchError, Result};
pub use task::{
    OptimizeOptions, OptimizeReport, SceneSummary, TaskFailure, TaskHandler, TaskKind,
    TaskOutput, TaskRequest, TransformJob, ValidationReport,
};
