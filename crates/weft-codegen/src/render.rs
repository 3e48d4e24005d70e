//! Component plan rendering.
//!
//! Produces the framework-neutral JSX-flavored component and its
//! stylesheet. The output never depends on anything but the plan, so the
//! same plan always renders byte-identical text.

use convert_case::{Case, Casing};
use weft_core::{ComponentIr, ComponentPlan, ElementKind, PlanElement};

/// Viewport width below which the responsive rule applies.
pub const BREAKPOINT_PX: u32 = 768;

/// Body of the fallback component.
pub const FALLBACK_BODY: [&str; 3] = [
    "<h1>Generated Component</h1>",
    "<p>This component was generated from your design.</p>",
    "<button className=\"cta-button\">Get Started</button>",
];

const SYSTEM_FONTS: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Render a plan into markup, template and stylesheet.
pub fn render(plan: &ComponentPlan) -> ComponentIr {
    let body = render_body(plan);
    ComponentIr {
        component_name: plan.component_name.clone(),
        markup: render_markup(plan, &body),
        stylesheet: render_stylesheet(plan),
        template: body.join("\n"),
        interactive: plan.interactive,
    }
}

/// Root class name for a component.
pub fn root_class(component_name: &str) -> String {
    component_name.to_case(Case::Kebab)
}

/// One line per element, unindented.
fn render_body(plan: &ComponentPlan) -> Vec<String> {
    if plan.uses_fallback() {
        return FALLBACK_BODY.iter().map(|l| l.to_string()).collect();
    }
    plan.elements
        .iter()
        .enumerate()
        .map(|(i, element)| render_element(i, element))
        .collect()
}

fn render_element(index: usize, element: &PlanElement) -> String {
    let class = format!("{}-{}", element.kind.class_prefix(), index);
    match &element.kind {
        ElementKind::Text { tag, content } => {
            format!("<{tag} className=\"{class}\">{}</{tag}>", escape_text(content))
        }
        ElementKind::Button { label } => format!(
            "<button className=\"{class}\" onClick={{() => console.log('Button clicked')}}>{}</button>",
            escape_text(label)
        ),
        ElementKind::Image { src, alt } => format!(
            "<img src=\"{}\" alt=\"{}\" className=\"{class}\" />",
            escape_attr(src),
            escape_attr(alt)
        ),
        ElementKind::Block { content } => {
            format!("<div className=\"{class}\">{}</div>", escape_text(content))
        }
    }
}

fn render_markup(plan: &ComponentPlan, body: &[String]) -> String {
    let name = &plan.component_name;
    let mut lines = Vec::new();

    if plan.interactive {
        lines.push("import React, { useState } from 'react';".to_string());
    } else {
        lines.push("import React from 'react';".to_string());
    }
    lines.push(String::new());

    if plan.typescript {
        lines.push(format!("interface {}Props {{", name));
        lines.push("  className?: string;".to_string());
        lines.push("  [key: string]: unknown;".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
        lines.push(format!(
            "const {name}: React.FC<{name}Props> = ({{ className = '', ...props }}) => {{"
        ));
    } else {
        lines.push(format!("const {} = ({{ className = '', ...props }}) => {{", name));
    }

    if plan.interactive {
        lines.push("  const [isActive, setIsActive] = useState(false);".to_string());
        lines.push(String::new());
    }

    let active = if plan.interactive { " data-active={isActive}" } else { "" };
    lines.push("  return (".to_string());
    lines.push(format!(
        "    <div className={{`{} ${{className}}`}}{} {{...props}}>",
        root_class(name),
        active
    ));
    lines.push("      <div className=\"component-content\">".to_string());
    for line in body {
        lines.push(format!("        {}", line));
    }
    lines.push("      </div>".to_string());
    lines.push("    </div>".to_string());
    lines.push("  );".to_string());
    lines.push("};".to_string());
    lines.push(String::new());
    lines.push(format!("export default {};", name));

    lines.join("\n")
}

fn render_stylesheet(plan: &ComponentPlan) -> String {
    let root = root_class(&plan.component_name);
    let mut blocks = Vec::new();

    if !plan.custom_properties.is_empty() {
        let mut lines = vec![":root {".to_string()];
        for (name, value) in &plan.custom_properties {
            lines.push(format!("  --{}: {};", name, value));
        }
        lines.push("}".to_string());
        blocks.push(lines.join("\n"));
    }

    let font_family = match plan.custom_property("weft-font-0") {
        Some(_) => format!("var(--weft-font-0), {}", SYSTEM_FONTS),
        None => SYSTEM_FONTS.to_string(),
    };

    blocks.push(format!(
        ".{root} {{
  display: flex;
  flex-direction: column;
  padding: 20px;
  border-radius: 8px;
  background: #ffffff;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
  font-family: {font_family};
}}"
    ));
    blocks.push(
        ".component-content {
  flex: 1;
}"
        .to_string(),
    );
    blocks.push(format!(
        ".{root} h1 {{
  margin: 0 0 16px 0;
  font-size: 24px;
  font-weight: 600;
  color: #1a1a1a;
}}"
    ));
    blocks.push(format!(
        ".{root} p {{
  margin: 0 0 16px 0;
  color: #666666;
  line-height: 1.5;
}}"
    ));
    blocks.push(
        ".cta-button {
  padding: 12px 24px;
  background: #007bff;
  color: white;
  border: none;
  border-radius: 6px;
  font-weight: 500;
  cursor: pointer;
  transition: background-color 0.2s;
}

.cta-button:hover {
  background: #0056b3;
}"
        .to_string(),
    );

    for (i, element) in plan.elements.iter().enumerate() {
        blocks.push(element_rule(i, element));
    }

    blocks.push(format!(
        "@media (max-width: {BREAKPOINT_PX}px) {{
  .{root} {{
    padding: 16px;
  }}

  .{root} h1 {{
    font-size: 20px;
  }}
}}"
    ));

    blocks.join("\n\n")
}

fn element_rule(index: usize, element: &PlanElement) -> String {
    let class = format!("{}-{}", element.kind.class_prefix(), index);
    let mut lines = vec![format!(".{} {{", class)];

    match &element.kind {
        ElementKind::Text { .. } => {
            lines.push(format!(
                "  font-size: {};",
                element.font_size.as_deref().unwrap_or("16px")
            ));
            lines.push(format!(
                "  color: {};",
                element.color.as_deref().unwrap_or("#333333")
            ));
            lines.push("  margin-bottom: 8px;".to_string());
        }
        ElementKind::Button { .. } => {
            lines.push("  padding: 8px 16px;".to_string());
            lines.push(format!(
                "  background: {};",
                element.background.as_deref().unwrap_or("#007bff")
            ));
            lines.push(format!(
                "  color: {};",
                element.color.as_deref().unwrap_or("#ffffff")
            ));
            lines.push("  border: none;".to_string());
            lines.push(format!(
                "  border-radius: {};",
                element.radius.as_deref().unwrap_or("4px")
            ));
            lines.push("  cursor: pointer;".to_string());
            lines.push("  font-size: 14px;".to_string());
            lines.push("}".to_string());
            lines.push(String::new());
            lines.push(format!(".{}:hover {{", class));
            lines.push("  opacity: 0.9;".to_string());
        }
        ElementKind::Image { .. } => {
            lines.push("  max-width: 100%;".to_string());
            lines.push("  height: auto;".to_string());
            lines.push(format!(
                "  border-radius: {};",
                element.radius.as_deref().unwrap_or("4px")
            ));
        }
        ElementKind::Block { .. } => {
            lines.push("  margin-bottom: 12px;".to_string());
            if let Some(radius) = &element.radius {
                lines.push(format!("  border-radius: {};", radius));
            }
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Escape element text so it cannot open tags or expressions.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(elements: Vec<PlanElement>) -> ComponentPlan {
        let mut plan = ComponentPlan::new("GeneratedComponent", true);
        plan.elements = elements;
        plan
    }

    #[test]
    fn test_fallback_component() {
        let ir = render(&plan(vec![]));
        assert!(ir.markup.contains("<h1>Generated Component</h1>"));
        assert!(ir.markup.contains("className=\"cta-button\""));
        assert!(ir.markup.ends_with("export default GeneratedComponent;"));
        assert!(!ir.markup.contains("useState"));
        assert_eq!(ir.template.lines().count(), 3);
    }

    #[test]
    fn test_typed_and_untyped_signatures() {
        let typed = render(&plan(vec![]));
        assert!(typed.markup.contains("interface GeneratedComponentProps {"));
        assert!(typed.markup.contains(
            "const GeneratedComponent: React.FC<GeneratedComponentProps> = ({ className = '', ...props }) => {"
        ));

        let mut untyped = plan(vec![]);
        untyped.typescript = false;
        let ir = render(&untyped);
        assert!(!ir.markup.contains("interface"));
        assert!(ir
            .markup
            .contains("const GeneratedComponent = ({ className = '', ...props }) => {"));
    }

    #[test]
    fn test_interactive_declares_state() {
        let mut p = plan(vec![PlanElement::new(ElementKind::Button {
            label: "Go".into(),
        })]);
        p.interactive = true;
        let ir = render(&p);
        assert!(ir.markup.starts_with("import React, { useState } from 'react';"));
        assert!(ir.markup.contains("const [isActive, setIsActive] = useState(false);"));
        assert!(ir.markup.contains("data-active={isActive}"));
        assert!(ir.markup.contains(
            "<button className=\"button-element-0\" onClick={() => console.log('Button clicked')}>Go</button>"
        ));
    }

    #[test]
    fn test_element_rules_follow_elements() {
        let ir = render(&plan(vec![
            PlanElement::new(ElementKind::Text {
                tag: "h2".into(),
                content: "Hi".into(),
            })
            .with_color("rgb(255, 0, 0)")
            .with_font_size("28px"),
            PlanElement::new(ElementKind::Image {
                src: "/a.png".into(),
                alt: "A".into(),
            }),
        ]));
        assert!(ir.markup.contains("<h2 className=\"text-element-0\">Hi</h2>"));
        assert!(ir
            .markup
            .contains("<img src=\"/a.png\" alt=\"A\" className=\"image-element-1\" />"));
        assert!(ir.stylesheet.contains(".text-element-0 {\n  font-size: 28px;\n  color: rgb(255, 0, 0);"));
        assert!(ir.stylesheet.contains(".image-element-1 {"));
        assert!(ir.stylesheet.contains("@media (max-width: 768px)"));
    }

    #[test]
    fn test_text_is_escaped() {
        let ir = render(&plan(vec![PlanElement::new(ElementKind::Block {
            content: "<b>{x}</b>".into(),
        })]));
        assert!(ir
            .markup
            .contains("<div className=\"element-0\">&lt;b&gt;&#123;x&#125;&lt;/b&gt;</div>"));
    }

    #[test]
    fn test_custom_properties_emitted() {
        let mut p = plan(vec![]);
        p.custom_properties = vec![
            ("weft-color-0".into(), "rgb(0, 0, 0)".into()),
            ("weft-font-0".into(), "'Inter'".into()),
        ];
        let ir = render(&p);
        assert!(ir.stylesheet.starts_with(":root {\n  --weft-color-0: rgb(0, 0, 0);"));
        assert!(ir.stylesheet.contains("font-family: var(--weft-font-0), -apple-system"));
    }

    #[test]
    fn test_root_class_from_name() {
        assert_eq!(root_class("PricingCard"), "pricing-card");
    }
}
