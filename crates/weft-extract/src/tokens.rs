//! Design token derivation.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Upper bound on spacing tokens kept per document.
pub const MAX_SPACING_TOKENS: usize = 10;

/// Largest spacing value considered a token.
const MAX_SPACING_VALUE: f64 = 100.0;

/// Spacing grid unit.
const SPACING_GRID: f64 = 4.0;

/// Deduplicated design primitives in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTokenSet {
    /// CSS color strings.
    pub colors: IndexSet<String>,
    /// Font family names.
    pub fonts: IndexSet<String>,
    /// Spacing values, e.g. `"8px"`.
    pub spacing: IndexSet<String>,
    /// Corner radii, e.g. `"4px"`.
    pub radii: IndexSet<String>,
}

impl DesignTokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_color(&mut self, color: impl Into<String>) {
        self.colors.insert(color.into());
    }

    pub fn add_font(&mut self, family: impl Into<String>) {
        self.fonts.insert(family.into());
    }

    /// Offer a raw spacing value. Returns whether it became a token.
    pub fn offer_spacing(&mut self, value: f64) -> bool {
        if self.spacing.len() >= MAX_SPACING_TOKENS {
            return false;
        }
        match quantize_spacing(value) {
            Some(px) => self.spacing.insert(format!("{}px", px)),
            None => false,
        }
    }

    pub fn add_radius(&mut self, radius: f64) {
        if radius > 0.0 {
            self.radii.insert(format_px(radius));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.fonts.is_empty() && self.spacing.is_empty() && self.radii.is_empty()
    }
}

/// Keep raw values in `(0, 100]` that sit exactly on the 4-unit grid.
fn quantize_spacing(value: f64) -> Option<i64> {
    let on_grid = value > 0.0 && value <= MAX_SPACING_VALUE && value % SPACING_GRID == 0.0;
    on_grid.then_some(value as i64)
}

/// Filter raw spacing candidates into token strings.
pub fn spacing_tokens(candidates: impl IntoIterator<Item = f64>) -> Vec<String> {
    let mut tokens = DesignTokenSet::new();
    for value in candidates {
        tokens.offer_spacing(value);
    }
    tokens.spacing.into_iter().collect()
}

/// Format a length as pixels, dropping a zero fraction.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", (value * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_filter() {
        let tokens = spacing_tokens([4.0, 5.0, 8.0, 104.0, 12.0]);
        assert_eq!(tokens, vec!["4px", "8px", "12px"]);
    }

    #[test]
    fn test_spacing_cap() {
        let tokens = spacing_tokens((1..=30).map(|n| (n * 4) as f64));
        assert_eq!(tokens.len(), MAX_SPACING_TOKENS);
        assert_eq!(tokens.first().map(String::as_str), Some("4px"));
        assert_eq!(tokens.last().map(String::as_str), Some("40px"));
    }

    #[test]
    fn test_spacing_dedup_and_bounds() {
        let tokens = spacing_tokens([8.0, 8.0, 0.0, -4.0, 100.0, f64::NAN]);
        assert_eq!(tokens, vec!["8px", "100px"]);
    }

    #[test]
    fn test_spacing_is_not_rounded_onto_the_grid() {
        assert!(spacing_tokens([100.4, 7.6, 101.0, 3.999]).is_empty());
        assert_eq!(spacing_tokens([7.6, 8.0]), vec!["8px"]);
    }

    #[test]
    fn test_radius_format() {
        let mut tokens = DesignTokenSet::new();
        tokens.add_radius(8.0);
        tokens.add_radius(2.5);
        tokens.add_radius(8.0);
        tokens.add_radius(0.0);
        assert_eq!(tokens.radii.iter().collect::<Vec<_>>(), vec!["8px", "2.5px"]);
    }
}
