//! Background task handler.
//!
//! [`CodeTasks`] runs on the dispatcher's worker thread. Every operation
//! is a pure function of its payload and is also callable directly, which
//! is how callers fall back when the dispatcher is unavailable.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use weft_core::Framework;
use weft_dispatch::{
    OptimizeOptions, OptimizeReport, SceneSummary, TaskFailure, TaskHandler, TaskOutput,
    TaskRequest, TransformJob, ValidationReport,
};

use crate::render::render;

/// Nesting depth above which validation warns.
pub const MAX_NESTING_DEPTH: usize = 4;

/// Line count above which validation warns.
pub const MAX_FUNCTION_LINES: usize = 50;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclassName=").expect("className pattern"));

static ON_CLICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"onClick=\{[^}]*\}").expect("onClick pattern"));

static REACT_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^import React\b[^\n]*from 'react';[ \t]*\n?").expect("react import pattern")
});

static NAMED_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^import\s+(?:(\w+)\s*,\s*)?\{([^}]*)\}\s*from\s*(['\x22][^'\x22]+['\x22])\s*;?\s*$")
        .expect("named import pattern")
});

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*[\s\S]*?\*/").expect("block comment pattern"));

static EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\b").expect("export pattern"));

static CSS_MINIFY_STEPS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"/\*[\s\S]*?\*/", ""),
        (r"\s+", " "),
        (r";\s*\}", "}"),
        (r"\s*\{\s*", "{"),
        (r"\s*\}\s*", "}"),
        (r"\s*,\s*", ","),
        (r"\s*:\s*", ":"),
        (r"\s*;\s*", ";"),
    ]
    .iter()
    .map(|(p, r)| (Regex::new(p).expect("css minify pattern"), *r))
    .collect()
});

/// Task handler for the code-processing worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeTasks;

impl CodeTasks {
    pub fn new() -> Self {
        Self
    }
}

impl TaskHandler for CodeTasks {
    fn handle(&mut self, request: TaskRequest) -> Result<TaskOutput, TaskFailure> {
        trace!(kind = %request.kind(), "handling task");
        match request {
            TaskRequest::ParseScene { markup } => {
                if markup.trim().is_empty() {
                    return Err(TaskFailure::new("empty markup"));
                }
                Ok(TaskOutput::Scene(parse_markup(&markup)))
            }
            TaskRequest::Transform(TransformJob::Render(plan)) => {
                Ok(TaskOutput::Rendered(render(&plan)))
            }
            TaskRequest::Transform(TransformJob::Rewrite { code, framework }) => {
                Ok(TaskOutput::Rewritten(rewrite_syntax(&code, framework)))
            }
            TaskRequest::Optimize { code, options } => {
                Ok(TaskOutput::Optimized(optimize_source(&code, options)))
            }
            TaskRequest::Validate { code } => Ok(TaskOutput::Validated(validate_source(&code))),
        }
    }
}

// ============================================================================
// parse-scene
// ============================================================================

/// Structural summary of an element fragment.
///
/// Braced attribute values and spreads are skipped as opaque expressions.
/// Void elements and `/>` need no closing tag.
pub fn parse_markup(markup: &str) -> SceneSummary {
    let chars: Vec<char> = markup.chars().collect();
    let mut summary = SceneSummary {
        balanced: true,
        ..Default::default()
    };
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '<' {
            text.push(chars[i]);
            i += 1;
            continue;
        }

        if starts_with(&chars, i, "<!--") {
            flush_text(&mut text, &mut summary);
            i = find(&chars, i + 4, "-->").map_or(chars.len(), |end| end + 3);
            continue;
        }

        match chars.get(i + 1) {
            Some('/') => {
                flush_text(&mut text, &mut summary);
                let (name, end) = read_while(&chars, i + 2, is_name_char);
                i = find(&chars, end, ">").map_or(chars.len(), |gt| gt + 1);
                if stack.last() == Some(&name) {
                    stack.pop();
                } else {
                    summary.balanced = false;
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                flush_text(&mut text, &mut summary);
                let (name, end) = read_while(&chars, i + 1, is_name_char);
                let (self_closing, next) = read_attributes(&chars, end, &mut summary);
                i = next;

                summary.tags.push(name.clone());
                summary.node_count += 1;
                let depth = stack.len() + 1;
                summary.max_depth = summary.max_depth.max(depth);
                if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
                    stack.push(name);
                }
            }
            _ => {
                text.push('<');
                i += 1;
            }
        }
    }

    flush_text(&mut text, &mut summary);
    if !stack.is_empty() {
        summary.balanced = false;
    }
    summary
}

/// Scan attributes up to the end of an opening tag.
fn read_attributes(chars: &[char], mut j: usize, summary: &mut SceneSummary) -> (bool, usize) {
    loop {
        j = skip_ws(chars, j);
        match chars.get(j) {
            None => {
                summary.balanced = false;
                return (false, j);
            }
            Some('>') => return (false, j + 1),
            Some('/') if chars.get(j + 1) == Some(&'>') => return (true, j + 2),
            Some('{') => j = skip_braced(chars, j),
            Some(_) => {
                let (attr, end) = read_while(chars, j, |c| {
                    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '{')
                });
                if attr.is_empty() {
                    j += 1;
                    continue;
                }
                if !summary.attributes.contains(&attr) {
                    summary.attributes.push(attr);
                }
                j = skip_ws(chars, end);
                if chars.get(j) == Some(&'=') {
                    j = skip_value(chars, skip_ws(chars, j + 1));
                }
            }
        }
    }
}

fn skip_value(chars: &[char], j: usize) -> usize {
    match chars.get(j) {
        Some(&q) if q == '"' || q == '\'' => {
            let mut k = j + 1;
            while k < chars.len() && chars[k] != q {
                k += 1;
            }
            (k + 1).min(chars.len())
        }
        Some('{') => skip_braced(chars, j),
        _ => read_while(chars, j, |c| !c.is_whitespace() && c != '>').1,
    }
}

/// Index just past the brace matching the one at `start`.
fn skip_braced(chars: &[char], start: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut k = start;
    while k < chars.len() {
        let c = chars[k];
        match quote {
            Some(q) => {
                if c == '\\' {
                    k += 1;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return k + 1;
                    }
                }
                _ => {}
            },
        }
        k += 1;
    }
    chars.len()
}

fn flush_text(text: &mut String, summary: &mut SceneSummary) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        summary.text.push(trimmed.to_string());
    }
    text.clear();
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
}

fn read_while(chars: &[char], start: usize, pred: impl Fn(char) -> bool) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && pred(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn skip_ws(chars: &[char], mut j: usize) -> usize {
    while j < chars.len() && chars[j].is_whitespace() {
        j += 1;
    }
    j
}

fn starts_with(chars: &[char], at: usize, needle: &str) -> bool {
    needle
        .chars()
        .enumerate()
        .all(|(k, c)| chars.get(at + k) == Some(&c))
}

fn find(chars: &[char], from: usize, needle: &str) -> Option<usize> {
    (from..chars.len()).find(|&k| starts_with(chars, k, needle))
}

// ============================================================================
// transform
// ============================================================================

/// Rewrite JSX-flavored source into a target framework's template syntax.
///
/// Renames `className`, maps click handlers to the framework's event
/// binding calling `handleClick`, and swaps the React import for the
/// framework's own. React input is returned unchanged.
pub fn rewrite_syntax(code: &str, framework: Framework) -> String {
    let (click, import) = match framework {
        Framework::React => return code.to_string(),
        Framework::Vue => (
            "@click=\"handleClick\"",
            "import { defineComponent, ref } from 'vue';\n",
        ),
        Framework::Angular => (
            "(click)=\"handleClick()\"",
            "import { Component, Input } from '@angular/core';\n",
        ),
        Framework::Svelte => ("on:click={handleClick}", ""),
    };

    let code = CLASS_NAME_RE.replace_all(code, "class=");
    let code = ON_CLICK_RE.replace_all(&code, click);
    REACT_IMPORT_RE.replace_all(&code, import).into_owned()
}

// ============================================================================
// optimize
// ============================================================================

/// Strip comments, prune unused named imports and collapse whitespace.
pub fn optimize_source(code: &str, options: OptimizeOptions) -> OptimizeReport {
    let mut out = code.to_string();

    if options.remove_comments {
        out = BLOCK_COMMENT_RE.replace_all(&out, "").into_owned();
        out = out
            .lines()
            .filter(|line| !line.trim_start().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
    }

    if options.remove_unused_imports {
        out = remove_unused_imports(&out);
    }

    out = if options.minify_css {
        minify_css(&out)
    } else {
        collapse_whitespace(&out)
    };

    OptimizeReport {
        original_size: code.len(),
        optimized_size: out.len(),
        code: out,
    }
}

/// Drop named imports never referenced outside their import line.
pub fn remove_unused_imports(code: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut out = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = NAMED_IMPORT_RE.captures(line.trim()) else {
            out.push(line.to_string());
            continue;
        };

        let rest: String = lines
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != idx)
            .map(|(_, l)| *l)
            .collect::<Vec<_>>()
            .join("\n");

        let names: Vec<&str> = caps[2]
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect();
        let used: Vec<&str> = names
            .iter()
            .copied()
            .filter(|item| {
                let local = item.rsplit(" as ").next().unwrap_or(item);
                is_referenced(&rest, local.trim_start_matches("type ").trim())
            })
            .collect();

        if used.len() == names.len() {
            out.push(line.to_string());
            continue;
        }

        let source = &caps[3];
        match (caps.get(1).map(|m| m.as_str()), used.is_empty()) {
            (Some(default), false) => out.push(format!(
                "import {}, {{ {} }} from {};",
                default,
                used.join(", "),
                source
            )),
            (None, false) => out.push(format!("import {{ {} }} from {};", used.join(", "), source)),
            (Some(default), true) => out.push(format!("import {} from {};", default, source)),
            (None, true) => {}
        }
    }

    let mut joined = out.join("\n");
    if code.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

fn is_referenced(haystack: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    haystack.match_indices(name).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + name.len()..].chars().next();
        let ident = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        !ident(before) && !ident(after)
    })
}

/// Trim trailing whitespace and collapse runs of blank lines.
pub fn collapse_whitespace(code: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in code.lines().map(str::trim_end) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Whitespace and comment minification for stylesheets.
pub fn minify_css(css: &str) -> String {
    let mut out = css.to_string();
    for (re, replacement) in CSS_MINIFY_STEPS.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out.trim().to_string()
}

// ============================================================================
// validate
// ============================================================================

/// Shallow lint of generated source.
pub fn validate_source(code: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !EXPORT_RE.is_match(code) {
        report.warnings.push("No exports found".to_string());
    }

    match nesting_depth(code) {
        Some(depth) if depth > MAX_NESTING_DEPTH => report
            .warnings
            .push(format!("High nesting depth: {} levels", depth)),
        Some(_) => {}
        None => report.errors.push("Unbalanced braces".to_string()),
    }

    let lines = code.lines().count();
    if lines > MAX_FUNCTION_LINES {
        report.warnings.push(format!("Long function: {} lines", lines));
    }

    report
}

/// Deepest brace nesting, or `None` when braces do not balance.
pub fn nesting_depth(code: &str) -> Option<usize> {
    let mut depth: usize = 0;
    let mut max = 0;
    for c in code.chars() {
        match c {
            '{' => {
                depth += 1;
                max = max.max(depth);
            }
            '}' => depth = depth.checked_sub(1)?,
            _ => {}
        }
    }
    (depth == 0).then_some(max)
}
