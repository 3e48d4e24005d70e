//! Depth-first design traversal.

use glam::DVec2;
use tracing::debug;
use weft_core::{BoundingBox, DesignDocument, DesignNode, NodeKind, Paint, PaintKind, TypeStyle};

use crate::fill::resolve_fill;
use crate::scene::{Geometry, NormalizedScene, Shape};
use crate::tokens::DesignTokenSet;

/// Bounding box used when no node carries one.
pub const DEFAULT_BOUNDS: BoundingBox = BoundingBox {
    x: 0.0,
    y: 0.0,
    width: 400.0,
    height: 300.0,
};

/// Vertical offset from a text box's top edge to its anchor.
///
/// Approximates baseline alignment; not a typographic metric.
pub const TEXT_BASELINE_OFFSET: f64 = 20.0;

/// Name of the scene substituted for documents without drawable nodes.
pub const PLACEHOLDER_NAME: &str = "placeholder-card";

/// Extracts a normalized scene and design tokens from a document.
#[derive(Debug, Clone)]
pub struct DesignExtractor {
    text_baseline_offset: f64,
    default_bounds: BoundingBox,
}

impl DesignExtractor {
    pub fn new() -> Self {
        Self {
            text_baseline_offset: TEXT_BASELINE_OFFSET,
            default_bounds: DEFAULT_BOUNDS,
        }
    }

    /// Override the text anchor offset.
    pub fn with_text_baseline_offset(mut self, offset: f64) -> Self {
        self.text_baseline_offset = offset;
        self
    }

    /// Extract the scene and tokens.
    ///
    /// Falls back to the placeholder card when the document has no root or
    /// the root holds no drawable leaf.
    pub fn extract(&self, document: &DesignDocument) -> (NormalizedScene, DesignTokenSet) {
        if let Some(root) = document.root() {
            let name = document.name.clone().unwrap_or_else(|| root.name.clone());
            let (scene, tokens) = self.extract_tree(root, name, false);
            if !scene.is_empty() {
                debug!(shapes = scene.len(), colors = tokens.colors.len(), "design extracted");
                return (scene, tokens);
            }
        }

        debug!("no drawable nodes, using placeholder scene");
        self.extract_tree(&placeholder_card(), PLACEHOLDER_NAME.to_string(), true)
    }

    fn extract_tree(
        &self,
        root: &DesignNode,
        name: String,
        placeholder: bool,
    ) -> (NormalizedScene, DesignTokenSet) {
        let mut walk = Walk::default();
        self.visit(root, None, &mut walk);

        let scene = NormalizedScene {
            name,
            shapes: walk.shapes,
            bounds: walk.bounds.unwrap_or(self.default_bounds),
            placeholder,
        };
        (scene, walk.tokens)
    }

    fn visit(&self, node: &DesignNode, parent: Option<&str>, walk: &mut Walk) {
        if let Some(bounds) = node.bounding_box {
            walk.bounds = Some(match walk.bounds {
                Some(acc) => acc.union(&bounds),
                None => bounds,
            });
        }
        self.collect_tokens(node, walk);

        let groups_children =
            node.is_container() || (node.kind == NodeKind::Other && node.has_children());
        if groups_children {
            let scope = if node.id.is_empty() { parent } else { Some(node.id.as_str()) };
            for child in &node.children {
                self.visit(child, scope, walk);
            }
            return;
        }

        walk.shapes.push(self.shape_for(node, parent));
    }

    fn shape_for(&self, node: &DesignNode, parent: Option<&str>) -> Shape {
        let bounds = node
            .bounding_box
            .unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0));

        let geometry = match node.kind {
            NodeKind::Rectangle => Geometry::rect_of(&bounds),
            NodeKind::Ellipse => Geometry::ellipse_in(&bounds),
            NodeKind::Text => {
                let style = node.style.clone().unwrap_or_default();
                Geometry::Text {
                    anchor: DVec2::new(bounds.x, bounds.y + self.text_baseline_offset),
                    content: node.characters.clone().unwrap_or_default(),
                    font_size: style.font_size,
                    font_family: style.font_family,
                }
            }
            _ => Geometry::Path {
                origin: DVec2::new(bounds.x, bounds.y),
                size: DVec2::new(bounds.width, bounds.height),
            },
        };

        let image_ref = node
            .fills
            .first()
            .filter(|p| p.kind == PaintKind::Image)
            .and_then(|p| p.image_ref.clone());

        Shape {
            id: node.id.clone(),
            name: node.name.clone(),
            geometry,
            fill: resolve_fill(&node.fills),
            image_ref,
            parent: parent.map(str::to_string),
            corner_radius: node.corner_radius,
        }
    }

    fn collect_tokens(&self, node: &DesignNode, walk: &mut Walk) {
        if matches!(node.fills.first(), Some(p) if p.kind == PaintKind::Solid) {
            walk.tokens.add_color(resolve_fill(&node.fills));
        }
        if let Some(family) = node.style.as_ref().and_then(|s| s.font_family.as_ref()) {
            walk.tokens.add_font(family.clone());
        }
        for value in node.spacing_candidates() {
            walk.tokens.offer_spacing(value);
        }
        for radius in node.corner_radii() {
            walk.tokens.add_radius(radius);
        }
    }
}

impl Default for DesignExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Walk {
    shapes: Vec<Shape>,
    bounds: Option<BoundingBox>,
    tokens: DesignTokenSet,
}

/// Bordered card with a heading, body text and a button.
fn placeholder_card() -> DesignNode {
    let white = Paint::solid(1.0, 1.0, 1.0, 1.0);
    let ink = Paint::solid(0.102, 0.102, 0.102, 1.0);
    let muted = Paint::solid(0.4, 0.4, 0.4, 1.0);
    let accent = Paint::solid(0.0, 0.482, 1.0, 1.0);

    DesignNode::new(NodeKind::Frame, "Placeholder Card")
        .with_id("placeholder-card")
        .with_bounds(0.0, 0.0, 400.0, 300.0)
        .with_corner_radius(8.0)
        .with_child(
            DesignNode::new(NodeKind::Rectangle, "Border")
                .with_id("placeholder-border")
                .with_bounds(0.0, 0.0, 400.0, 300.0)
                .with_fill(white)
                .with_corner_radius(8.0),
        )
        .with_child(
            DesignNode::new(NodeKind::Text, "Heading")
                .with_id("placeholder-heading")
                .with_bounds(24.0, 24.0, 352.0, 32.0)
                .with_fill(ink)
                .with_text("Generated Component")
                .with_style(TypeStyle::new("Inter", 24.0)),
        )
        .with_child(
            DesignNode::new(NodeKind::Text, "Body")
                .with_id("placeholder-body")
                .with_bounds(24.0, 72.0, 352.0, 48.0)
                .with_fill(muted)
                .with_text("This component was generated from your design.")
                .with_style(TypeStyle::new("Inter", 16.0)),
        )
        .with_child(
            DesignNode::new(NodeKind::Frame, "Button")
                .with_id("placeholder-button")
                .with_bounds(24.0, 232.0, 140.0, 44.0)
                .with_fill(accent)
                .with_corner_radius(4.0)
                .with_item_spacing(8.0)
                .with_child(
                    DesignNode::new(NodeKind::Text, "Label")
                        .with_id("placeholder-button-label")
                        .with_bounds(40.0, 244.0, 108.0, 20.0)
                        .with_text("Get Started")
                        .with_style(TypeStyle::new("Inter", 14.0)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ShapeKind;
    use serde_json::json;

    fn card() -> DesignDocument {
        DesignDocument::from_value(json!({
            "name": "Profile",
            "document": {
                "id": "1:0",
                "name": "Card",
                "type": "FRAME",
                "absoluteBoundingBox": { "x": 100, "y": 50, "width": 300, "height": 200 },
                "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }],
                "itemSpacing": 12,
                "paddingLeft": 16,
                "children": [
                    {
                        "id": "1:1",
                        "name": "Avatar",
                        "type": "ELLIPSE",
                        "absoluteBoundingBox": { "x": 116, "y": 66, "width": 40, "height": 40 },
                        "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0, "a": 0.5 } }]
                    },
                    {
                        "id": "1:2",
                        "name": "Name",
                        "type": "TEXT",
                        "characters": "Ada Lovelace",
                        "absoluteBoundingBox": { "x": 168, "y": 70, "width": 200, "height": 24 },
                        "style": { "fontFamily": "Inter", "fontSize": 18 }
                    },
                    {
                        "id": "1:3",
                        "name": "Badge",
                        "type": "RECTANGLE",
                        "cornerRadius": 6,
                        "absoluteBoundingBox": { "x": 380, "y": 40, "width": 40, "height": 20 }
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_leaves_become_shapes() {
        let (scene, _) = DesignExtractor::new().extract(&card());
        let kinds: Vec<_> = scene.shapes.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec![ShapeKind::Ellipse, ShapeKind::Text, ShapeKind::Rect]);
        assert!(!scene.placeholder);
        assert_eq!(scene.name, "Profile");
        assert!(scene.shapes.iter().all(|s| s.parent.as_deref() == Some("1:0")));
    }

    #[test]
    fn test_geometry_is_absolute() {
        let (scene, _) = DesignExtractor::new().extract(&card());
        assert_eq!(
            scene.shapes[0].geometry,
            Geometry::Ellipse {
                center: DVec2::new(136.0, 86.0),
                radii: DVec2::new(20.0, 20.0),
            }
        );
        match &scene.shapes[1].geometry {
            Geometry::Text { anchor, content, .. } => {
                assert_eq!(*anchor, DVec2::new(168.0, 90.0));
                assert_eq!(content, "Ada Lovelace");
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_bounds_are_union() {
        let (scene, _) = DesignExtractor::new().extract(&card());
        assert_eq!(scene.bounds, BoundingBox::new(100.0, 40.0, 320.0, 210.0));
    }

    #[test]
    fn test_fills_and_tokens() {
        let (scene, tokens) = DesignExtractor::new().extract(&card());
        assert_eq!(scene.shapes[0].fill, "rgba(255, 0, 0, 0.5)");
        assert_eq!(scene.shapes[2].fill, "rgb(0, 0, 0)");
        assert!(tokens.colors.contains("rgb(255, 255, 255)"));
        assert!(tokens.colors.contains("rgba(255, 0, 0, 0.5)"));
        assert_eq!(tokens.fonts.iter().collect::<Vec<_>>(), vec!["Inter"]);
        assert_eq!(tokens.spacing.iter().collect::<Vec<_>>(), vec!["12px", "16px"]);
        assert_eq!(tokens.radii.iter().collect::<Vec<_>>(), vec!["6px"]);
    }

    #[test]
    fn test_empty_document_yields_placeholder() {
        let (scene, tokens) = DesignExtractor::new().extract(&DesignDocument::empty());
        assert!(scene.placeholder);
        assert_eq!(scene.name, PLACEHOLDER_NAME);
        assert_eq!(scene.bounds, DEFAULT_BOUNDS);
        assert_eq!(scene.shapes_of(ShapeKind::Text).count(), 3);
        assert!(!tokens.colors.is_empty());
    }

    #[test]
    fn test_childless_frame_yields_placeholder() {
        let doc = DesignDocument::new(DesignNode::new(NodeKind::Frame, "Empty"));
        let (scene, _) = DesignExtractor::new().extract(&doc);
        assert!(scene.placeholder);
    }

    #[test]
    fn test_missing_boxes_use_default_bounds() {
        let doc = DesignDocument::new(
            DesignNode::new(NodeKind::Group, "g").with_child(DesignNode::new(NodeKind::Text, "t").with_text("hi")),
        );
        let (scene, _) = DesignExtractor::new().extract(&doc);
        assert!(!scene.placeholder);
        assert_eq!(scene.bounds, DEFAULT_BOUNDS);
    }

    #[test]
    fn test_unknown_leaf_is_path() {
        let doc = DesignDocument::new(
            DesignNode::new(NodeKind::Frame, "f")
                .with_child(DesignNode::new(NodeKind::Vector, "icon").with_bounds(0.0, 0.0, 16.0, 16.0)),
        );
        let (scene, _) = DesignExtractor::new().extract(&doc);
        assert_eq!(scene.shapes[0].kind(), ShapeKind::Path);
    }
}
