//! Normalized scene types.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use weft_core::BoundingBox;

/// Flat shape list derived from a design tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedScene {
    /// Scene name (document or root layer name).
    pub name: String,
    /// Leaf shapes in depth-first order.
    pub shapes: Vec<Shape>,
    /// Union of every bounding box encountered.
    pub bounds: BoundingBox,
    /// Whether this is the substituted placeholder card.
    pub placeholder: bool,
}

impl NormalizedScene {
    /// Shapes of one kind.
    pub fn shapes_of(&self, kind: ShapeKind) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

/// One drawable leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Source node ID.
    pub id: String,
    /// Source layer name.
    pub name: String,
    /// Absolute geometry.
    pub geometry: Geometry,
    /// Resolved CSS fill color.
    pub fill: String,
    /// Image reference when the first fill is an image paint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// ID of the nearest enclosing container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Uniform corner radius, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Text content for text shapes.
    pub fn text(&self) -> Option<&str> {
        match &self.geometry {
            Geometry::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }

    /// Font size for text shapes.
    pub fn font_size(&self) -> Option<f64> {
        match &self.geometry {
            Geometry::Text { font_size, .. } => *font_size,
            _ => None,
        }
    }
}

/// Shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Text,
    Path,
}

/// Absolute geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// Axis-aligned rectangle.
    Rect { origin: DVec2, size: DVec2 },
    /// Ellipse by center point and radii.
    Ellipse { center: DVec2, radii: DVec2 },
    /// Text anchored near its baseline.
    Text {
        anchor: DVec2,
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
    },
    /// Any other vector leaf, kept as its bounding box.
    Path { origin: DVec2, size: DVec2 },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Text { .. } => ShapeKind::Text,
            Self::Path { .. } => ShapeKind::Path,
        }
    }

    /// Ellipse geometry inscribed in a bounding box.
    pub fn ellipse_in(bounds: &BoundingBox) -> Self {
        let radii = DVec2::new(bounds.width / 2.0, bounds.height / 2.0);
        Self::Ellipse {
            center: DVec2::new(bounds.x, bounds.y) + radii,
            radii,
        }
    }

    /// Rectangle geometry covering a bounding box.
    pub fn rect_of(bounds: &BoundingBox) -> Self {
        Self::Rect {
            origin: DVec2::new(bounds.x, bounds.y),
            size: DVec2::new(bounds.width, bounds.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_in_box() {
        let geometry = Geometry::ellipse_in(&BoundingBox::new(10.0, 20.0, 40.0, 30.0));
        assert_eq!(
            geometry,
            Geometry::Ellipse {
                center: DVec2::new(30.0, 35.0),
                radii: DVec2::new(20.0, 15.0),
            }
        );
    }
}
