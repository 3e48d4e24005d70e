//! Template engine for generated files.

use crate::error::{CodegenError, Result};
use convert_case::{Case, Casing};
use handlebars::Handlebars;
use serde::Serialize;

/// Template engine using Handlebars.
///
/// Output is source code, so values are inserted verbatim. Use the `html`
/// helper where a value lands inside HTML text.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Create a new template engine.
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        Self::register_helpers(&mut handlebars);

        Self { handlebars }
    }

    /// Render a template string directly.
    pub fn render_string<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(CodegenError::TemplateError)
    }

    fn register_helpers(handlebars: &mut Handlebars) {
        register_case_helper(handlebars, "kebab_case", Case::Kebab);

        // Indent every non-blank line
        handlebars.register_helper(
            "indent",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let content = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    let spaces = h
                        .param(1)
                        .and_then(|v| v.value().as_u64())
                        .unwrap_or(4) as usize;
                    out.write(&indent(content, spaces))?;
                    Ok(())
                },
            ),
        );

        // HTML-escape a value
        handlebars.register_helper(
            "html",
            Box::new(
                |h: &handlebars::Helper,
                 _r: &Handlebars,
                 _ctx: &handlebars::Context,
                 _rc: &mut handlebars::RenderContext,
                 out: &mut dyn handlebars::Output| {
                    let param = h
                        .param(0)
                        .and_then(|v| v.value().as_str())
                        .unwrap_or("");
                    out.write(&handlebars::html_escape(param))?;
                    Ok(())
                },
            ),
        );
    }
}

impl<'a> Default for TemplateEngine<'a> {
    fn default() -> Self {
        Self::new()
    }
}

fn register_case_helper(handlebars: &mut Handlebars, name: &str, case: Case) {
    handlebars.register_helper(
        name,
        Box::new(
            move |h: &handlebars::Helper,
                  _r: &Handlebars,
                  _ctx: &handlebars::Context,
                  _rc: &mut handlebars::RenderContext,
                  out: &mut dyn handlebars::Output| {
                let param = h
                    .param(0)
                    .and_then(|v| v.value().as_str())
                    .unwrap_or("");
                out.write(&param.to_case(case))?;
                Ok(())
            },
        ),
    );
}

/// Indent every non-blank line by `spaces`.
pub fn indent(content: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_are_not_escaped() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_string("{{code}}", &json!({"code": "<div className=\"a\">"}))
            .unwrap();
        assert_eq!(result, "<div className=\"a\">");
    }

    #[test]
    fn test_html_helper() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_string("{{html code}}", &json!({"code": "<b>"}))
            .unwrap();
        assert_eq!(result, "&lt;b&gt;");
    }

    #[test]
    fn test_kebab_case_helper() {
        let engine = TemplateEngine::new();
        let data = json!({"name": "GeneratedComponent"});
        assert_eq!(
            engine.render_string("app-{{kebab_case name}}", &data).unwrap(),
            "app-generated-component"
        );
    }

    #[test]
    fn test_indent_helper() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_string("{{indent body 2}}", &json!({"body": "<p>a</p>\n\n<p>b</p>"}))
            .unwrap();
        assert_eq!(result, "  <p>a</p>\n\n  <p>b</p>");
    }
}
