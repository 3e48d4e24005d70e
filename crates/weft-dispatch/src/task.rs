//! Typed task requests and outputs.
//!
//! Requests carry everything a handler needs; handlers never see session
//! state. All payloads are plain serializable data.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use weft_core::{ComponentIr, ComponentPlan, Framework};

/// Task type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    ParseScene,
    Transform,
    Optimize,
    Validate,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseScene => "parse-scene",
            Self::Transform => "transform",
            Self::Optimize => "optimize",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of background work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum TaskRequest {
    /// Structural parse of rendered markup.
    ParseScene { markup: String },
    /// Render or rewrite component source.
    Transform(TransformJob),
    /// Strip and shrink source text.
    Optimize {
        code: String,
        #[serde(default)]
        options: OptimizeOptions,
    },
    /// Shallow lint of source text.
    Validate { code: String },
}

impl TaskRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::ParseScene { .. } => TaskKind::ParseScene,
            Self::Transform(_) => TaskKind::Transform,
            Self::Optimize { .. } => TaskKind::Optimize,
            Self::Validate { .. } => TaskKind::Validate,
        }
    }
}

/// Transform job payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformJob {
    /// Build markup and stylesheet from a component plan.
    Render(ComponentPlan),
    /// Rewrite JSX-flavored source into a target framework's syntax.
    Rewrite { code: String, framework: Framework },
}

/// Options for the optimize task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeOptions {
    pub remove_comments: bool,
    pub remove_unused_imports: bool,
    pub minify_css: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            remove_unused_imports: true,
            minify_css: false,
        }
    }
}

/// Output of a completed task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum TaskOutput {
    Scene(SceneSummary),
    Rendered(ComponentIr),
    Rewritten(String),
    Optimized(OptimizeReport),
    Validated(ValidationReport),
}

impl TaskOutput {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Scene(_) => "scene",
            Self::Rendered(_) => "rendered",
            Self::Rewritten(_) => "rewritten",
            Self::Optimized(_) => "optimized",
            Self::Validated(_) => "validated",
        }
    }
}

/// Structural summary of a markup string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSummary {
    /// Element tag names in opening order.
    pub tags: Vec<String>,
    /// Distinct attribute names in first-seen order.
    pub attributes: Vec<String>,
    /// Non-blank text runs between tags.
    pub text: Vec<String>,
    /// Number of elements.
    pub node_count: usize,
    /// Deepest element nesting.
    pub max_depth: usize,
    /// Whether every opened element is closed in order.
    pub balanced: bool,
}

/// Result of the optimize task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeReport {
    pub code: String,
    pub original_size: usize,
    pub optimized_size: usize,
}

impl OptimizeReport {
    /// Bytes removed.
    pub fn savings(&self) -> usize {
        self.original_size.saturating_sub(self.optimized_size)
    }
}

/// Result of the validate task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Failure reported by a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TaskFailure(pub String);

impl TaskFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Executes tasks on the background worker.
///
/// Implementations must be pure with respect to their inputs.
pub trait TaskHandler: Send + 'static {
    fn handle(&mut self, request: TaskRequest) -> std::result::Result<TaskOutput, TaskFailure>;
}

impl<F> TaskHandler for F
where
    F: FnMut(TaskRequest) -> std::result::Result<TaskOutput, TaskFailure> + Send + 'static,
{
    fn handle(&mut self, request: TaskRequest) -> std::result::Result<TaskOutput, TaskFailure> {
        self(request)
    }
}
