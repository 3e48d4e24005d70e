//! Code generation for the weft pipeline.
//!
//! This crate covers every phase between extraction and the final
//! artifact:
//!
//! - [`analyzer`] - design pattern recognition
//! - [`structure`] - project layout planning
//! - [`plan`], [`render`] and [`synthesizer`] - the framework-neutral component
//! - [`tasks`] - the task handler run by the background dispatcher
//! - [`adapter`] - React, Vue, Angular and Svelte output
//! - [`quality`] - quality scoring
//! - [`optimizer`] and [`patch`] - conditional source rewrites
//! - [`assembler`] - files, metrics, preview and build validation
//!
//! # Example
//!
//! ```ignore
//! use weft_codegen::{ComponentSynthesizer, SyntaxAdapter, QualityAssessor};
//!
//! let ir = ComponentSynthesizer::new().synthesize(&scene, &tokens, &patterns, &config).await;
//! let output = SyntaxAdapter::new().adapt_sync(&ir, &config)?;
//! let quality = QualityAssessor::new().assess(&output, &config);
//! ```

pub mod adapter;
pub mod analyzer;
pub mod assembler;
pub mod error;
pub mod optimizer;
pub mod patch;
pub mod plan;
pub mod quality;
pub mod render;
pub mod structure;
pub mod synthesizer;
pub mod tasks;
pub mod templates;

pub use adapter::{template_descriptor, FrameworkAdapter, SyntaxAdapter};
pub use analyzer::{code_suggestions, HeuristicAnalyzer, PatternAnalyzer};
pub use assembler::{maintainability_index, now_millis, Assembler, Assembly};
pub use error::{CodegenError, Result};
pub use optimizer::Optimizer;
pub use patch::{CodePatcher, RegexPatcher};
pub use plan::build_plan;
pub use quality::QualityAssessor;
pub use render::render;
pub use structure::plan_structure;
pub use synthesizer::ComponentSynthesizer;
pub use tasks::CodeTasks;
pub use templates::TemplateEngine;
