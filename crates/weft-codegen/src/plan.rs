//! Component plan construction from a normalized scene.

use std::collections::HashSet;

use weft_core::{ComponentPlan, DesignPattern, ElementKind, GenerationConfig, PatternKind, PlanElement};
use weft_extract::{format_px, DesignTokenSet, NormalizedScene, Shape, ShapeKind};

/// Tags accepted verbatim from a layer name.
const SEMANTIC_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "label"];

/// Alt text for images without a usable layer name.
pub const DEFAULT_ALT: &str = "Generated image";

/// Build the element plan for a scene.
///
/// The placeholder scene produces an empty plan so rendering uses the
/// fixed fallback body. Plain rectangles and ellipses are decoration and
/// produce no element.
pub fn build_plan(
    scene: &NormalizedScene,
    tokens: &DesignTokenSet,
    patterns: &[DesignPattern],
    config: &GenerationConfig,
) -> ComponentPlan {
    let mut plan = ComponentPlan::new(config.component_name.clone(), config.typescript);
    plan.interactive = patterns.iter().any(|p| p.kind.is_interactive());
    plan.custom_properties = custom_properties(tokens);

    if scene.placeholder {
        return plan;
    }

    let buttons: HashSet<&str> = patterns
        .iter()
        .filter(|p| p.kind == PatternKind::Button)
        .map(|p| p.node_id.as_str())
        .collect();

    for shape in &scene.shapes {
        if let Some(element) = element_for(shape, &buttons) {
            plan.elements.push(element);
        }
    }
    plan
}

fn element_for(shape: &Shape, buttons: &HashSet<&str>) -> Option<PlanElement> {
    if let Some(src) = &shape.image_ref {
        let alt = if shape.name.trim().is_empty() {
            DEFAULT_ALT.to_string()
        } else {
            shape.name.clone()
        };
        return Some(PlanElement::new(ElementKind::Image {
            src: src.clone(),
            alt,
        }));
    }

    match shape.kind() {
        ShapeKind::Text => {
            let content = shape.text().unwrap_or_default().to_string();
            let in_button = shape
                .parent
                .as_deref()
                .is_some_and(|parent| buttons.contains(parent));

            let element = if in_button {
                PlanElement::new(ElementKind::Button { label: content })
            } else {
                let mut element = PlanElement::new(ElementKind::Text {
                    tag: semantic_tag(shape).to_string(),
                    content,
                })
                .with_color(shape.fill.clone());
                if let Some(size) = shape.font_size() {
                    element = element.with_font_size(format_px(size));
                }
                element
            };
            Some(element)
        }
        ShapeKind::Path => {
            let mut element = PlanElement::new(ElementKind::Block {
                content: shape.name.clone(),
            });
            if let Some(radius) = shape.corner_radius.filter(|r| *r > 0.0) {
                element = element.with_radius(format_px(radius));
            }
            Some(element)
        }
        ShapeKind::Rect | ShapeKind::Ellipse => None,
    }
}

/// Semantic tag for a text shape: explicit tag names first, then naming
/// hints, then font size.
pub fn semantic_tag(shape: &Shape) -> &'static str {
    let name = shape.name.trim().to_lowercase();
    if let Some(tag) = SEMANTIC_TAGS.iter().find(|t| **t == name) {
        return tag;
    }
    if name.contains("title") || name.contains("heading") {
        return "h2";
    }
    match shape.font_size() {
        Some(size) if size >= 32.0 => "h1",
        Some(size) if size >= 24.0 => "h2",
        _ => "p",
    }
}

fn custom_properties(tokens: &DesignTokenSet) -> Vec<(String, String)> {
    let mut props = Vec::new();
    for (i, color) in tokens.colors.iter().enumerate() {
        props.push((format!("weft-color-{}", i), color.clone()));
    }
    for (i, font) in tokens.fonts.iter().enumerate() {
        props.push((format!("weft-font-{}", i), quoted_family(font)));
    }
    for (i, space) in tokens.spacing.iter().enumerate() {
        props.push((format!("weft-space-{}", i), space.clone()));
    }
    for (i, radius) in tokens.radii.iter().enumerate() {
        props.push((format!("weft-radius-{}", i), radius.clone()));
    }
    props
}

/// Quote a font family for a declaration value, dropping characters that
/// would end the string or the declaration.
fn quoted_family(family: &str) -> String {
    let clean: String = family
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | ';' | '{' | '}' | '\\' | '<' | '>') && !c.is_control())
        .collect();
    format!("'{}'", clean.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{DesignDocument, DesignNode, NodeKind, Paint, TypeStyle};
    use weft_extract::DesignExtractor;

    use crate::analyzer::HeuristicAnalyzer;

    fn plan_for(root: DesignNode) -> ComponentPlan {
        let doc = DesignDocument::new(root.clone());
        let (scene, tokens) = DesignExtractor::new().extract(&doc);
        let patterns = HeuristicAnalyzer::new().recognize(&root);
        build_plan(&scene, &tokens, &patterns, &GenerationConfig::default())
    }

    #[test]
    fn test_placeholder_scene_plans_fallback() {
        let (scene, tokens) = DesignExtractor::new().extract(&DesignDocument::empty());
        let plan = build_plan(&scene, &tokens, &[], &GenerationConfig::default());
        assert!(plan.uses_fallback());
        assert!(!plan.interactive);
    }

    #[test]
    fn test_text_button_and_image() {
        let root = DesignNode::new(NodeKind::Frame, "Hero")
            .with_bounds(0.0, 0.0, 600.0, 400.0)
            .with_child(
                DesignNode::new(NodeKind::Text, "Title")
                    .with_text("Welcome")
                    .with_style(TypeStyle::new("Inter", 36.0)),
            )
            .with_child(
                DesignNode::new(NodeKind::Rectangle, "Photo")
                    .with_bounds(0.0, 60.0, 200.0, 100.0)
                    .with_fill(Paint::image("img-1")),
            )
            .with_child(
                DesignNode::new(NodeKind::Frame, "CTA Button")
                    .with_id("cta")
                    .with_bounds(0.0, 200.0, 120.0, 40.0)
                    .with_fill(Paint::solid(0.0, 0.0, 1.0, 1.0))
                    .with_child(DesignNode::new(NodeKind::Text, "Label").with_text("Start")),
            )
            .with_child(DesignNode::new(NodeKind::Rectangle, "Divider").with_bounds(0.0, 300.0, 600.0, 1.0));

        let plan = plan_for(root);
        assert!(plan.interactive);
        assert_eq!(plan.elements.len(), 3);
        assert_eq!(
            plan.elements[0].kind,
            ElementKind::Text {
                tag: "h2".into(),
                content: "Welcome".into()
            }
        );
        assert_eq!(plan.elements[0].font_size.as_deref(), Some("36px"));
        assert_eq!(
            plan.elements[1].kind,
            ElementKind::Image {
                src: "img-1".into(),
                alt: "Photo".into()
            }
        );
        assert_eq!(
            plan.elements[2].kind,
            ElementKind::Button {
                label: "Start".into()
            }
        );
    }

    #[test]
    fn test_semantic_tag_by_font_size() {
        let root = DesignNode::new(NodeKind::Frame, "F")
            .with_child(
                DesignNode::new(NodeKind::Text, "Big")
                    .with_text("a")
                    .with_style(TypeStyle::new("Inter", 40.0)),
            )
            .with_child(DesignNode::new(NodeKind::Text, "span").with_text("b"))
            .with_child(DesignNode::new(NodeKind::Text, "Body").with_text("c"));
        let tags: Vec<_> = plan_for(root)
            .elements
            .into_iter()
            .map(|e| match e.kind {
                ElementKind::Text { tag, .. } => tag,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(tags, vec!["h1", "span", "p"]);
    }

    #[test]
    fn test_vector_becomes_block() {
        let root = DesignNode::new(NodeKind::Frame, "F")
            .with_child(DesignNode::new(NodeKind::Vector, "Logo").with_corner_radius(4.0));
        let plan = plan_for(root);
        assert_eq!(
            plan.elements[0].kind,
            ElementKind::Block {
                content: "Logo".into()
            }
        );
        assert_eq!(plan.elements[0].radius.as_deref(), Some("4px"));
    }

    #[test]
    fn test_tokens_become_custom_properties() {
        let root = DesignNode::new(NodeKind::Frame, "F")
            .with_fill(Paint::solid(1.0, 0.0, 0.0, 1.0))
            .with_child(
                DesignNode::new(NodeKind::Text, "t")
                    .with_text("x")
                    .with_style(TypeStyle::new("Inter", 12.0)),
            );
        let plan = plan_for(root);
        assert_eq!(plan.custom_property("weft-color-0"), Some("rgb(255, 0, 0)"));
        assert_eq!(plan.custom_property("weft-font-0"), Some("'Inter'"));
    }

    #[test]
    fn test_font_family_cannot_escape_declaration() {
        let mut tokens = DesignTokenSet::new();
        tokens.add_font("Evil'; } body { color: red");
        let props = custom_properties(&tokens);
        assert_eq!(props[0].1, "'Evil  body  color: red'");
        assert!(!props[0].1[1..props[0].1.len() - 1].contains(['\'', ';', '{', '}']));
    }
}
