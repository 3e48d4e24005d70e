//! Design extraction.
//!
//! Walks a design document depth-first and produces:
//!
//! 1. A [`NormalizedScene`]: a flat list of shapes with absolute geometry,
//!    resolved fill colors and the union bounding box.
//! 2. A [`DesignTokenSet`]: deduplicated colors, font families, spacing
//!    values and corner radii, all in unit-bearing string form.
//!
//! Extraction never fails. A document without any drawable node yields a
//! fixed placeholder card so later phases always receive content.
//!
//! # Example
//!
//! ```ignore
//! use weft_extract::DesignExtractor;
//!
//! let (scene, tokens) = DesignExtractor::new().extract(&document);
//! println!("{}", scene.to_svg());
//! ```

pub mod extractor;
pub mod fill;
pub mod scene;
pub mod svg;
pub mod tokens;

pub use extractor::{DesignExtractor, DEFAULT_BOUNDS, PLACEHOLDER_NAME, TEXT_BASELINE_OFFSET};
pub use fill::{resolve_fill, resolve_paint};
pub use scene::{Geometry, NormalizedScene, Shape, ShapeKind};
pub use tokens::{format_px, spacing_tokens, DesignTokenSet, MAX_SPACING_TOKENS};
