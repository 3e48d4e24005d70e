//! Textual patches applied to generated source.
//!
//! Generated code has a known shape, so patches work on text. Callers use
//! [`CodePatcher`] so a parse-tree based implementation can replace
//! [`RegexPatcher`].

use std::sync::LazyLock;

use regex::Regex;
use weft_core::Framework;

/// Label added to buttons without one.
pub const DEFAULT_BUTTON_LABEL: &str = "Generated button";

static BARE_DIV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div>").expect("bare div pattern"));

static CONTENT_DIV_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div ((?:className|class)="component-content")>"#).expect("content div pattern")
});

static ANGULAR_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"import \{ Component,").expect("angular import pattern")
});

static STYLE_URLS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)styleUrls: \[[^\]]*\],$").expect("styleUrls pattern")
});

/// Source rewrites used by the optimizer.
pub trait CodePatcher: Send + Sync {
    /// Add a landmark role to generic containers.
    fn add_landmark_roles(&self, code: &str) -> String;

    /// Add an `aria-label` to every button without one.
    fn label_buttons(&self, code: &str) -> String;

    /// Mark the top-level component as memoized for its framework.
    fn memoize_component(&self, code: &str, framework: Framework, name: &str) -> String;

    /// Give the component a named export next to its default export.
    fn normalize_exports(&self, code: &str, framework: Framework, name: &str) -> String;
}

/// Regex and scanner backed [`CodePatcher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexPatcher;

impl RegexPatcher {
    pub fn new() -> Self {
        Self
    }
}

impl CodePatcher for RegexPatcher {
    fn add_landmark_roles(&self, code: &str) -> String {
        let code = BARE_DIV_RE.replace_all(code, r#"<div role="main">"#);
        CONTENT_DIV_RE
            .replace_all(&code, r#"<div $1 role="main">"#)
            .into_owned()
    }

    fn label_buttons(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut rest = code;

        while let Some(start) = find_button_tag(rest) {
            let Some(end) = tag_end(rest, start) else {
                break;
            };
            let tag = &rest[start..end];
            out.push_str(&rest[..start]);
            if tag.contains("aria-label") {
                out.push_str(tag);
            } else {
                let insert_at = if tag.ends_with("/>") { tag.len() - 2 } else { tag.len() - 1 };
                let (head, tail) = tag.split_at(insert_at);
                out.push_str(head.trim_end());
                out.push_str(&format!(" aria-label=\"{}\"", DEFAULT_BUTTON_LABEL));
                if tail.starts_with('/') {
                    out.push(' ');
                }
                out.push_str(tail);
            }
            rest = &rest[end..];
        }

        out.push_str(rest);
        out
    }

    fn memoize_component(&self, code: &str, framework: Framework, name: &str) -> String {
        match framework {
            Framework::React => {
                let plain = format!("export default {};", name);
                let memo = format!("export default React.memo({});", name);
                if code.contains(&memo) {
                    code.to_string()
                } else {
                    code.replacen(&plain, &memo, 1)
                }
            }
            Framework::Angular => {
                if code.contains("ChangeDetectionStrategy") {
                    return code.to_string();
                }
                let code = ANGULAR_IMPORT_RE
                    .replace(code, "import { ChangeDetectionStrategy, Component,");
                STYLE_URLS_RE
                    .replace(&code, "$0\n${1}changeDetection: ChangeDetectionStrategy.OnPush,")
                    .into_owned()
            }
            Framework::Svelte => {
                const OPTIONS: &str = "<svelte:options immutable={true} />";
                if code.starts_with(OPTIONS) {
                    code.to_string()
                } else {
                    format!("{}\n\n{}", OPTIONS, code)
                }
            }
            Framework::Vue => code.to_string(),
        }
    }

    fn normalize_exports(&self, code: &str, framework: Framework, name: &str) -> String {
        if framework != Framework::React {
            return code.to_string();
        }
        let Ok(re) = Regex::new(&format!(r"(?m)^const {}\b", regex::escape(name))) else {
            return code.to_string();
        };
        re.replacen(code, 1, format!("export const {}", name))
            .into_owned()
    }
}

/// Byte offset of the next `<button` opening tag.
fn find_button_tag(code: &str) -> Option<usize> {
    code.match_indices("<button").find_map(|(at, _)| {
        let next = code[at + "<button".len()..].chars().next();
        matches!(next, Some(c) if c.is_whitespace() || c == '>' || c == '/').then_some(at)
    })
}

/// Byte offset just past the `>` closing the tag opened at `start`.
///
/// Quoted strings and braced expressions may contain `>`.
fn tag_end(code: &str, start: usize) -> Option<usize> {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start + 1;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Some(i + 1),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_roles() {
        let patched = RegexPatcher::new()
            .add_landmark_roles("<div>\n<div className=\"component-content\">\n<div class=\"x\">");
        assert_eq!(
            patched,
            "<div role=\"main\">\n<div className=\"component-content\" role=\"main\">\n<div class=\"x\">"
        );
    }

    #[test]
    fn test_label_buttons_skips_arrow_functions() {
        let code = "<button className=\"b\" onClick={() => console.log('x')}>Go</button>";
        assert_eq!(
            RegexPatcher::new().label_buttons(code),
            "<button className=\"b\" onClick={() => console.log('x')} aria-label=\"Generated button\">Go</button>"
        );
    }

    #[test]
    fn test_label_buttons_keeps_existing_labels() {
        let code = "<button aria-label=\"Close\">x</button><button>y</button>";
        assert_eq!(
            RegexPatcher::new().label_buttons(code),
            "<button aria-label=\"Close\">x</button><button aria-label=\"Generated button\">y</button>"
        );
    }

    #[test]
    fn test_memoize_react() {
        let p = RegexPatcher::new();
        let once = p.memoize_component("export default Card;", Framework::React, "Card");
        assert_eq!(once, "export default React.memo(Card);");
        assert_eq!(p.memoize_component(&once, Framework::React, "Card"), once);
    }

    #[test]
    fn test_memoize_angular() {
        let code = "import { Component, Input } from '@angular/core';\n\n@Component({\n  styleUrls: ['../styles/Card.css'],\n})";
        let patched = RegexPatcher::new().memoize_component(code, Framework::Angular, "Card");
        assert!(patched.starts_with("import { ChangeDetectionStrategy, Component, Input }"));
        assert!(patched.contains(
            "  styleUrls: ['../styles/Card.css'],\n  changeDetection: ChangeDetectionStrategy.OnPush,"
        ));
    }

    #[test]
    fn test_memoize_vue_is_noop() {
        let code = "<template></template>";
        assert_eq!(RegexPatcher::new().memoize_component(code, Framework::Vue, "Card"), code);
    }

    #[test]
    fn test_normalize_exports() {
        let code = "const Card = () => null;\n\nexport default Card;";
        assert_eq!(
            RegexPatcher::new().normalize_exports(code, Framework::React, "Card"),
            "export const Card = () => null;\n\nexport default Card;"
        );
    }
}
