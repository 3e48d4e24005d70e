//! SVG rendering of a normalized scene.

use crate::scene::{Geometry, NormalizedScene, Shape};

/// Font size used for text shapes without typography.
const DEFAULT_FONT_SIZE: f64 = 16.0;

impl NormalizedScene {
    /// Render the scene as a standalone SVG document.
    ///
    /// The view box is the scene bounds, so absolute coordinates map
    /// directly. Shapes are drawn in scene order.
    pub fn to_svg(&self) -> String {
        let b = self.bounds;
        let width = b.width.max(1.0);
        let height = b.height.max(1.0);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">
"#,
            width, height, b.x, b.y, width, height
        ));

        for shape in &self.shapes {
            svg.push_str("  ");
            svg.push_str(&shape_element(shape));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn shape_element(shape: &Shape) -> String {
    let fill = escape_xml(&shape.fill);
    match &shape.geometry {
        Geometry::Rect { origin, size } | Geometry::Path { origin, size } => {
            let mut attrs = vec![
                format!("x=\"{}\"", origin.x),
                format!("y=\"{}\"", origin.y),
                format!("width=\"{}\"", size.x),
                format!("height=\"{}\"", size.y),
            ];
            if let Some(r) = shape.corner_radius.filter(|r| *r > 0.0) {
                attrs.push(format!("rx=\"{}\"", r));
                attrs.push(format!("ry=\"{}\"", r));
            }
            attrs.push(format!("fill=\"{}\"", fill));
            format!("<rect {} />", attrs.join(" "))
        }
        Geometry::Ellipse { center, radii } => format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" />",
            center.x, center.y, radii.x, radii.y, fill
        ),
        Geometry::Text {
            anchor,
            content,
            font_size,
            font_family,
        } => format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-family=\"{}\">{}</text>",
            anchor.x,
            anchor.y,
            fill,
            font_size.unwrap_or(DEFAULT_FONT_SIZE),
            escape_xml(font_family.as_deref().unwrap_or("sans-serif")),
            escape_xml(content)
        ),
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
