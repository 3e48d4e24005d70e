//! Design pattern analysis.

mod heuristic;

pub use heuristic::HeuristicAnalyzer;

use async_trait::async_trait;
use weft_core::{DesignNode, DesignPattern, PatternKind};

use crate::error::Result;

/// Classifies design nodes into UI patterns.
#[async_trait]
pub trait PatternAnalyzer: Send + Sync {
    /// Patterns found anywhere in the subtree rooted at `node`.
    async fn analyze(&self, node: &DesignNode) -> Result<Vec<DesignPattern>>;

    /// Code-level suggestions for a set of patterns, without duplicates.
    async fn code_suggestions(&self, patterns: &[DesignPattern]) -> Vec<String> {
        code_suggestions(patterns)
    }
}

/// Fixed code suggestions per pattern kind, deduplicated in first-seen order.
pub fn code_suggestions(patterns: &[DesignPattern]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for pattern in patterns {
        let suggestions: &[&str] = match pattern.kind {
            PatternKind::Card => &[
                "Consider using a Card component with proper semantic HTML",
                "Add transition effects for hover states",
            ],
            PatternKind::Button => &[
                "Implement button variants (primary, secondary, outline)",
                "Add loading and disabled states",
            ],
            PatternKind::Form => &[
                "Use a form validation library",
                "Implement proper error handling and display",
            ],
            PatternKind::Navigation => &[
                "Use client-side routing for navigation",
                "Implement responsive navigation with mobile menu",
            ],
            _ => &[],
        };
        for s in suggestions {
            if !out.iter().any(|o| o == s) {
                out.push((*s).to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(kind: PatternKind) -> DesignPattern {
        DesignPattern {
            kind,
            node_id: "n".into(),
            confidence: 1.0,
            suggestions: vec![],
            accessibility: vec![],
        }
    }

    #[test]
    fn test_code_suggestions_dedup() {
        let out = code_suggestions(&[
            pattern(PatternKind::Button),
            pattern(PatternKind::Button),
            pattern(PatternKind::Card),
        ]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], "Implement button variants (primary, secondary, outline)");
    }

    #[test]
    fn test_no_suggestions_for_unhandled_kinds() {
        assert!(code_suggestions(&[pattern(PatternKind::Modal)]).is_empty());
    }
}
