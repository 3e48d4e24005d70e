//! Fill resolution.

use weft_core::{LinearRgba, Paint, PaintKind};

/// Color used when a shape has no usable solid fill.
pub const OPAQUE_BLACK: &str = "rgb(0, 0, 0)";

/// Resolve a fill list to a CSS color string.
///
/// Only the first entry is considered. Solid paints convert unit-range
/// channels to `0..=255`; a sub-1 alpha produces `rgba(...)`. Anything
/// else resolves to opaque black.
pub fn resolve_fill(fills: &[Paint]) -> String {
    fills
        .first()
        .map(resolve_paint)
        .unwrap_or_else(|| OPAQUE_BLACK.to_string())
}

/// Resolve one paint to a CSS color string.
pub fn resolve_paint(paint: &Paint) -> String {
    match (paint.kind, paint.color) {
        (PaintKind::Solid, Some(color)) => css_color(color),
        _ => OPAQUE_BLACK.to_string(),
    }
}

fn css_color(color: LinearRgba) -> String {
    let r = channel(color.r);
    let g = channel(color.g);
    let b = channel(color.b);
    let a = color.a.clamp(0.0, 1.0);

    if a < 1.0 {
        format!("rgba({}, {}, {}, {})", r, g, b, round_alpha(a))
    } else {
        format!("rgb({}, {}, {})", r, g, b)
    }
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn round_alpha(a: f64) -> f64 {
    (a * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_red() {
        let fills = vec![Paint::solid(1.0, 0.0, 0.0, 1.0)];
        assert_eq!(resolve_fill(&fills), "rgb(255, 0, 0)");
    }

    #[test]
    fn test_translucent_red() {
        let fills = vec![Paint::solid(1.0, 0.0, 0.0, 0.5)];
        assert_eq!(resolve_fill(&fills), "rgba(255, 0, 0, 0.5)");
    }

    #[test]
    fn test_only_first_fill_is_used() {
        let fills = vec![Paint::solid(0.0, 0.0, 1.0, 1.0), Paint::solid(1.0, 0.0, 0.0, 1.0)];
        assert_eq!(resolve_fill(&fills), "rgb(0, 0, 255)");
    }

    #[test]
    fn test_missing_or_unsupported_fill_is_black() {
        assert_eq!(resolve_fill(&[]), OPAQUE_BLACK);
        assert_eq!(resolve_fill(&[Paint::image("abc")]), OPAQUE_BLACK);
    }

    #[test]
    fn test_channel_rounding() {
        let fills = vec![Paint::solid(0.5, 0.2, 0.999, 1.0)];
        assert_eq!(resolve_fill(&fills), "rgb(128, 51, 255)");
    }
}
