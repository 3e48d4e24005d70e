//! Design document model.
//!
//! The document is a tree of nodes as exported by a design tool: frames and
//! groups nest other nodes, leaves are rectangles, ellipses, text or vector
//! paths. Bounding boxes are absolute (canvas coordinates), never
//! parent-relative. Ownership of `children` makes the tree acyclic by
//! construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{CoreError, Result};

/// A design document: an optional root node plus document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Root node. `None` when the export had no usable tree.
    #[serde(default)]
    pub document: Option<DesignNode>,
}

impl DesignDocument {
    /// Create a document around a root node.
    pub fn new(root: DesignNode) -> Self {
        Self {
            name: None,
            document: Some(root),
        }
    }

    /// Create a document with no root node.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the document name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Build a document from an already-parsed JSON value.
    ///
    /// A `null` value is an absent document and is rejected. A root that
    /// cannot be decoded as a node tree is dropped with a warning so the
    /// extractor can substitute its placeholder scene. A bare node (an
    /// object with a `type` key and no `document` key) is accepted as the
    /// root itself.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut object = match value {
            Value::Null => {
                return Err(CoreError::InvalidInput("design document is absent".into()))
            }
            Value::Object(object) => object,
            other => {
                return Err(CoreError::InvalidInput(format!(
                    "expected a JSON object, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);

        let root_value = if object.contains_key("document") {
            object.remove("document").unwrap_or(Value::Null)
        } else if object.contains_key("type") {
            Value::Object(object)
        } else {
            Value::Null
        };

        let document = match root_value {
            Value::Null => None,
            root => match serde_json::from_value::<DesignNode>(root) {
                Ok(node) => Some(node),
                Err(err) => {
                    warn!(error = %err, "design root cannot be traversed, dropping it");
                    None
                }
            },
        };

        Ok(Self { name, document })
    }

    /// Root node, if any.
    pub fn root(&self) -> Option<&DesignNode> {
        self.document.as_ref()
    }

    /// Stable byte representation used for fingerprinting.
    pub fn identity_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One node of the design tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    /// Node ID.
    #[serde(default)]
    pub id: String,
    /// Layer name.
    #[serde(default)]
    pub name: String,
    /// Node kind.
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    /// Absolute bounding box.
    #[serde(
        rename = "absoluteBoundingBox",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_box: Option<BoundingBox>,
    /// Fill paints, topmost last. Only the first entry is used for color.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
    /// Text content for text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Typography for text nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TypeStyle>,
    /// Uniform corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    /// Per-corner radii (top-left, top-right, bottom-right, bottom-left).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rectangle_corner_radii: Option<Vec<f64>>,
    /// Auto-layout gap between children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
}

impl DesignNode {
    /// Create a new node.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase().replace(' ', "-"),
            name,
            kind,
            ..Default::default()
        }
    }

    /// Set the node ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the absolute bounding box.
    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox::new(x, y, width, height));
        self
    }

    /// Append a fill paint.
    pub fn with_fill(mut self, paint: Paint) -> Self {
        self.fills.push(paint);
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.characters = Some(text.into());
        self
    }

    /// Set typography.
    pub fn with_style(mut self, style: TypeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Set a uniform corner radius.
    pub fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    /// Set the auto-layout gap.
    pub fn with_item_spacing(mut self, spacing: f64) -> Self {
        self.item_spacing = Some(spacing);
        self
    }

    /// Whether the node only groups other nodes.
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Whether this node has any children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this node has at least one fill.
    pub fn has_fill(&self) -> bool {
        !self.fills.is_empty()
    }

    /// Lowercased layer name, for keyword heuristics.
    pub fn name_lower(&self) -> String {
        self.name.to_lowercase()
    }

    /// Raw spacing values carried by this node (gap and paddings).
    pub fn spacing_candidates(&self) -> impl Iterator<Item = f64> + '_ {
        [
            self.item_spacing,
            self.padding_top,
            self.padding_right,
            self.padding_bottom,
            self.padding_left,
        ]
        .into_iter()
        .flatten()
    }

    /// Explicit corner radii carried by this node.
    pub fn corner_radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.corner_radius
            .into_iter()
            .chain(self.rectangle_corner_radii.iter().flatten().copied())
    }

    /// Visit this node and all descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a DesignNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Kind of design node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Document,
    Canvas,
    Frame,
    Group,
    Section,
    Component,
    ComponentSet,
    Instance,
    Rectangle,
    Ellipse,
    Text,
    Vector,
    Line,
    Star,
    RegularPolygon,
    BooleanOperation,
    #[default]
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Nodes whose only job is to hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Canvas
                | Self::Frame
                | Self::Group
                | Self::Section
                | Self::Component
                | Self::ComponentSet
                | Self::Instance
        )
    }
}

/// Absolute axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// A fill paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    /// Paint type.
    #[serde(rename = "type")]
    pub kind: PaintKind,
    /// Color for solid paints, channels in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<LinearRgba>,
    /// Image reference for image paints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Paint {
    /// Solid paint from unit-range channels.
    pub fn solid(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            kind: PaintKind::Solid,
            color: Some(LinearRgba { r, g, b, a }),
            image_ref: None,
        }
    }

    /// Image paint.
    pub fn image(image_ref: impl Into<String>) -> Self {
        Self {
            kind: PaintKind::Image,
            color: None,
            image_ref: Some(image_ref.into()),
        }
    }
}

/// Paint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    #[serde(other)]
    Other,
}

/// RGBA color with unit-range channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearRgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// Typography attached to a text node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
}

impl TypeStyle {
    pub fn new(font_family: impl Into<String>, font_size: f64) -> Self {
        Self {
            font_family: Some(font_family.into()),
            font_size: Some(font_size),
            font_weight: None,
        }
    }
}
