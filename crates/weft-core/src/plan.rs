//! Framework-neutral component plan and its rendered form.
//!
//! A [`ComponentPlan`] lists the elements recognized in a design; rendering
//! it produces a [`ComponentIr`] (one markup string and one stylesheet).

use serde::{Deserialize, Serialize};

/// Element list for one component, before any text is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPlan {
    /// Component identifier (PascalCase).
    pub component_name: String,
    /// Emit typed markup.
    pub typescript: bool,
    /// Declare one boolean toggle state.
    pub interactive: bool,
    /// Recognized elements, in document order.
    pub elements: Vec<PlanElement>,
    /// CSS custom properties derived from design tokens, name without `--`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_properties: Vec<(String, String)>,
}

impl ComponentPlan {
    pub fn new(component_name: impl Into<String>, typescript: bool) -> Self {
        Self {
            component_name: component_name.into(),
            typescript,
            interactive: false,
            elements: Vec::new(),
            custom_properties: Vec::new(),
        }
    }

    /// Value of a custom property, if declared.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether rendering will fall back to the fixed template body.
    pub fn uses_fallback(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One element of a component plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanElement {
    /// What to emit.
    pub kind: ElementKind,
    /// Foreground color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Font size with unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// Corner radius with unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<String>,
}

impl PlanElement {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            color: None,
            background: None,
            font_size: None,
            radius: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn with_font_size(mut self, size: impl Into<String>) -> Self {
        self.font_size = Some(size.into());
        self
    }

    pub fn with_radius(mut self, radius: impl Into<String>) -> Self {
        self.radius = Some(radius.into());
        self
    }
}

/// Kind of emitted element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementKind {
    /// Text element tagged with a semantic tag (`p`, `h1`, `span`, ...).
    Text { tag: String, content: String },
    /// Clickable button.
    Button { label: String },
    /// Image with source URL and alt text.
    Image { src: String, alt: String },
    /// Generic text block for anything else.
    Block { content: String },
}

impl ElementKind {
    /// Class-name prefix used by markup and stylesheet.
    pub fn class_prefix(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text-element",
            Self::Button { .. } => "button-element",
            Self::Image { .. } => "image-element",
            Self::Block { .. } => "element",
        }
    }
}

/// Rendered, framework-neutral component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentIr {
    /// Component identifier.
    pub component_name: String,
    /// Complete component source (JSX-flavored).
    pub markup: String,
    /// Stylesheet.
    pub stylesheet: String,
    /// The element tree alone, as returned by the component.
    pub template: String,
    /// Whether toggle state is declared.
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan_uses_fallback() {
        let plan = ComponentPlan::new("Card", true);
        assert!(plan.uses_fallback());
    }

    #[test]
    fn test_element_kind_serializes_tagged() {
        let kind = ElementKind::Button { label: "Go".into() };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "button");
        assert_eq!(json["label"], "Go");
    }
}
