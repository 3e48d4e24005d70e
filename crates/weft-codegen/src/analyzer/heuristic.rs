//! Rule-based pattern classification.

use async_trait::async_trait;
use tracing::debug;
use weft_core::{
    AccessibilityInsight, DesignNode, DesignPattern, InsightLevel, NodeKind, PatternKind,
};

use super::PatternAnalyzer;
use crate::error::Result;

/// Minimum touch target edge, in design units.
const MIN_TOUCH_TARGET: f64 = 44.0;

/// Maximum offset between sibling edges still counted as aligned.
const ALIGNMENT_TOLERANCE: f64 = 10.0;

/// Classifies nodes by shape, naming and child structure.
///
/// Every node in the tree is checked; each yields at most one pattern.
/// More specific rules win: button, then form, then navigation, then card.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify a whole tree synchronously.
    pub fn recognize(&self, root: &DesignNode) -> Vec<DesignPattern> {
        let mut patterns = Vec::new();
        root.walk(&mut |node| {
            if let Some(pattern) = self.identify(node) {
                patterns.push(pattern);
            }
        });
        debug!(count = patterns.len(), "patterns recognized");
        patterns
    }

    fn identify(&self, node: &DesignNode) -> Option<DesignPattern> {
        let (kind, confidence, suggestions, accessibility) = if self.is_button(node) {
            (
                PatternKind::Button,
                0.9,
                vec![
                    "Add focus states for keyboard navigation",
                    "Ensure minimum 44px touch target",
                    "Consider loading states",
                ],
                self.button_accessibility(node),
            )
        } else if self.is_form(node) {
            (
                PatternKind::Form,
                0.8,
                vec![
                    "Add proper form validation",
                    "Include error states",
                    "Group related fields with fieldsets",
                ],
                vec![
                    insight(
                        InsightLevel::Error,
                        "Associate labels with form controls",
                        "Use proper <label> elements or aria-labelledby",
                    ),
                    insight(
                        InsightLevel::Suggestion,
                        "Add form validation feedback",
                        "Implement aria-invalid and aria-describedby for errors",
                    ),
                ],
            )
        } else if self.is_navigation(node) {
            (
                PatternKind::Navigation,
                0.75,
                vec![
                    "Implement keyboard navigation",
                    "Add ARIA landmarks",
                    "Consider mobile hamburger menu",
                ],
                vec![
                    insight(
                        InsightLevel::Error,
                        "Add navigation landmarks",
                        "Use <nav> element with proper aria-label",
                    ),
                    insight(
                        InsightLevel::Suggestion,
                        "Implement keyboard navigation",
                        "Ensure all items are focusable and support arrow key navigation",
                    ),
                ],
            )
        } else if self.is_card(node) {
            (
                PatternKind::Card,
                0.85,
                vec![
                    "Consider adding subtle shadow for depth",
                    "Ensure proper spacing between elements",
                    "Add hover states for interactivity",
                ],
                vec![insight(
                    InsightLevel::Suggestion,
                    "Add semantic HTML structure",
                    "Use <article> or <section> elements for card containers",
                )],
            )
        } else {
            return None;
        };

        Some(DesignPattern {
            kind,
            node_id: node.id.clone(),
            confidence,
            suggestions: suggestions.into_iter().map(String::from).collect(),
            accessibility,
        })
    }

    fn is_card(&self, node: &DesignNode) -> bool {
        node.has_fill()
            && node.has_children()
            && matches!(node.kind, NodeKind::Frame | NodeKind::Rectangle)
    }

    fn is_button(&self, node: &DesignNode) -> bool {
        let has_text = node.children.iter().any(|c| c.kind == NodeKind::Text);
        let name = node.name_lower();
        let named = name.contains("button") || name.contains("btn");
        has_text && node.has_fill() && (named || self.has_button_dimensions(node))
    }

    fn has_button_dimensions(&self, node: &DesignNode) -> bool {
        node.bounding_box.is_some_and(|b| {
            b.width > 60.0 && b.width < 300.0 && b.height > 30.0 && b.height < 80.0
        })
    }

    fn is_form(&self, node: &DesignNode) -> bool {
        node.children.iter().any(|child| {
            let name = child.name_lower();
            name.contains("input")
                || name.contains("field")
                || (child.kind == NodeKind::Text && name.contains("label"))
        })
    }

    fn is_navigation(&self, node: &DesignNode) -> bool {
        if node.children.len() < 3 {
            return false;
        }
        let name = node.name_lower();
        self.is_linear_layout(node) || name.contains("nav") || name.contains("menu")
    }

    fn is_linear_layout(&self, node: &DesignNode) -> bool {
        let (Some(a), Some(b)) = (
            node.children.first().and_then(|c| c.bounding_box),
            node.children.get(1).and_then(|c| c.bounding_box),
        ) else {
            return false;
        };
        (a.y - b.y).abs() < ALIGNMENT_TOLERANCE || (a.x - b.x).abs() < ALIGNMENT_TOLERANCE
    }

    fn button_accessibility(&self, node: &DesignNode) -> Vec<AccessibilityInsight> {
        let mut insights = vec![insight(
            InsightLevel::Suggestion,
            "Add proper ARIA labels",
            "Include aria-label or aria-describedby attributes",
        )];

        let large_enough = node
            .bounding_box
            .is_some_and(|b| b.width >= MIN_TOUCH_TARGET && b.height >= MIN_TOUCH_TARGET);
        if !large_enough {
            insights.push(insight(
                InsightLevel::Error,
                "Touch target too small",
                "Ensure buttons are at least 44px x 44px",
            ));
        }
        insights
    }
}

#[async_trait]
impl PatternAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, node: &DesignNode) -> Result<Vec<DesignPattern>> {
        Ok(self.recognize(node))
    }
}

fn insight(level: InsightLevel, message: &str, fix: &str) -> AccessibilityInsight {
    AccessibilityInsight {
        level,
        message: message.to_string(),
        fix: fix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::Paint;

    fn button(name: &str, w: f64, h: f64) -> DesignNode {
        DesignNode::new(NodeKind::Frame, name)
            .with_bounds(0.0, 0.0, w, h)
            .with_fill(Paint::solid(0.0, 0.5, 1.0, 1.0))
            .with_child(DesignNode::new(NodeKind::Text, "Label").with_text("Go"))
    }

    #[test]
    fn test_button_by_dimensions() {
        let patterns = HeuristicAnalyzer::new().recognize(&button("Primary", 120.0, 44.0));
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].kind, PatternKind::Button);
        assert_eq!(patterns[0].confidence, 0.9);
        // 44 tall is large enough
        assert!(patterns[0]
            .accessibility
            .iter()
            .all(|i| i.level != InsightLevel::Error));
    }

    #[test]
    fn test_small_button_flags_touch_target() {
        let patterns = HeuristicAnalyzer::new().recognize(&button("Submit btn", 40.0, 20.0));
        assert_eq!(patterns[0].kind, PatternKind::Button);
        assert!(patterns[0]
            .accessibility
            .iter()
            .any(|i| i.level == InsightLevel::Error && i.message == "Touch target too small"));
    }

    #[test]
    fn test_card_with_nested_button() {
        let card = DesignNode::new(NodeKind::Frame, "Card")
            .with_bounds(0.0, 0.0, 400.0, 300.0)
            .with_fill(Paint::solid(1.0, 1.0, 1.0, 1.0))
            .with_child(DesignNode::new(NodeKind::Rectangle, "Image").with_bounds(0.0, 0.0, 400.0, 150.0))
            .with_child(button("Action", 120.0, 40.0).with_bounds(16.0, 200.0, 120.0, 40.0));

        let kinds: Vec<_> = HeuristicAnalyzer::new()
            .recognize(&card)
            .into_iter()
            .map(|p| p.kind)
            .collect();
        assert_eq!(kinds, vec![PatternKind::Card, PatternKind::Button]);
    }

    #[test]
    fn test_form_by_child_names() {
        let form = DesignNode::new(NodeKind::Group, "Signup")
            .with_child(DesignNode::new(NodeKind::Rectangle, "Email Input"));
        let patterns = HeuristicAnalyzer::new().recognize(&form);
        assert_eq!(patterns[0].kind, PatternKind::Form);
    }

    #[test]
    fn test_navigation_by_alignment() {
        let nav = DesignNode::new(NodeKind::Group, "Links")
            .with_child(DesignNode::new(NodeKind::Text, "Home").with_bounds(0.0, 0.0, 40.0, 20.0))
            .with_child(DesignNode::new(NodeKind::Text, "About").with_bounds(60.0, 2.0, 40.0, 20.0))
            .with_child(DesignNode::new(NodeKind::Text, "Contact").with_bounds(120.0, 0.0, 40.0, 20.0));
        let patterns = HeuristicAnalyzer::new().recognize(&nav);
        assert_eq!(patterns[0].kind, PatternKind::Navigation);
    }

    #[test]
    fn test_plain_shapes_have_no_pattern() {
        let rect = DesignNode::new(NodeKind::Rectangle, "Box");
        assert!(HeuristicAnalyzer::new().recognize(&rect).is_empty());
    }

    #[tokio::test]
    async fn test_analyze_trait() {
        let analyzer: &dyn PatternAnalyzer = &HeuristicAnalyzer::new();
        let patterns = analyzer.analyze(&button("Buy button", 100.0, 40.0)).await.unwrap();
        let suggestions = analyzer.code_suggestions(&patterns).await;
        assert_eq!(suggestions.len(), 2);
    }
}
