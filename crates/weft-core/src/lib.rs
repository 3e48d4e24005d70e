//! Core types for the weft design-to-code pipeline.
//!
//! This crate holds everything the pipeline stages share:
//!
//! - [`document`] - the hierarchical design document supplied as input
//! - [`config`] - the generation configuration
//! - [`plan`] - the framework-neutral component plan and its rendered IR
//! - [`artifact`] - framework output, quality assessment, files and metrics
//! - [`source`] - text scanning of generated source (imports, exports, complexity)
//!
//! # Example
//!
//! ```ignore
//! use weft_core::{DesignDocument, GenerationConfig};
//!
//! let doc = DesignDocument::from_json_str(&std::fs::read_to_string("design.json")?)?;
//! let config = GenerationConfig::default();
//! ```

pub mod artifact;
pub mod config;
pub mod document;
pub mod error;
pub mod plan;
pub mod source;

pub use artifact::{
    AccessibilityInsight, BuildLog, BuildStatus, CodeFile, CodeMetrics, DesignPattern,
    FrameworkOutput, GeneratedArtifact, InsightLevel, Issue, IssueCategory, IssueLevel,
    LogLevel, PatternKind, ProjectStructure, QualityAssessment, QualityCategories,
    TemplateDescriptor,
};
pub use config::{
    AccessibilityConfig, Framework, GenerationConfig, OptimizationConfig, Styling,
    TestingConfig, WcagLevel,
};
pub use document::{BoundingBox, DesignDocument, DesignNode, LinearRgba, NodeKind, Paint, PaintKind, TypeStyle};
pub use error::{CoreError, Result};
pub use plan::{ComponentIr, ComponentPlan, ElementKind, PlanElement};
pub use source::{RegexScanner, SourceScanner};
