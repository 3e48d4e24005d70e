//! Text scanning of generated source.
//!
//! Generated files are produced internally in known shapes, so pattern
//! scanning is sufficient. Callers go through [`SourceScanner`] so a
//! parse-tree based scanner can replace [`RegexScanner`] later.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#).expect("import pattern")
});

static EXPORT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:default\s+)?(?:class|function|const|let|var|interface|type)\s+(\w+)")
        .expect("export declaration pattern")
});

static EXPORT_DEFAULT_IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+default\s+(\w+)\s*;").expect("default export pattern")
});

static BRANCH_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\bif\s*\(",
        r"\belse\s*\{",
        r"\bfor\s*\(",
        r"\bwhile\s*\(",
        r"\bswitch\s*\(",
        r"\bcase\s+",
        r"\bcatch\s*\(",
        r"&&",
        r"\|\|",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("branch pattern"))
    .collect()
});

/// Read-only analysis of source text.
pub trait SourceScanner: Send + Sync {
    /// Module specifiers named by import statements, in order.
    fn imports(&self, source: &str) -> Vec<String>;

    /// Names exported by the source, in order, without duplicates.
    fn exports(&self, source: &str) -> Vec<String>;

    /// One plus the number of branching tokens.
    fn complexity(&self, source: &str) -> usize;

    /// Sum over distinct non-blank trimmed lines of `occurrences - 1`.
    fn duplicate_lines(&self, source: &str) -> usize;

    /// Language tag for a file name.
    fn detect_language(&self, file_name: &str) -> &'static str;
}

/// Regex-backed [`SourceScanner`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexScanner;

impl RegexScanner {
    pub fn new() -> Self {
        Self
    }
}

impl SourceScanner for RegexScanner {
    fn imports(&self, source: &str) -> Vec<String> {
        IMPORT_RE
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn exports(&self, source: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let found = EXPORT_DECL_RE
            .captures_iter(source)
            .chain(EXPORT_DEFAULT_IDENT_RE.captures_iter(source))
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()));
        for name in found {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn complexity(&self, source: &str) -> usize {
        1 + BRANCH_RES
            .iter()
            .map(|re| re.find_iter(source).count())
            .sum::<usize>()
    }

    fn duplicate_lines(&self, source: &str) -> usize {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
            *counts.entry(line).or_insert(0) += 1;
        }
        counts.values().filter(|&&n| n > 1).map(|n| n - 1).sum()
    }

    fn detect_language(&self, file_name: &str) -> &'static str {
        let ext = file_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
        match ext {
            "ts" | "tsx" => "typescript",
            "js" | "jsx" => "javascript",
            "vue" => "vue",
            "svelte" => "svelte",
            "css" => "css",
            "scss" => "scss",
            "html" => "html",
            "json" => "json",
            "md" => "markdown",
            _ => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"import React, { useState } from 'react';
import './GeneratedComponent.css';

export interface CardProps {
  title?: string;
}

const Card = ({ title }) => {
  if (title && title.length > 0) {
    return <h1>{title}</h1>;
  } else {
    return null;
  }
};

export default Card;"#;

    #[test]
    fn test_imports() {
        let scanner = RegexScanner::new();
        assert_eq!(scanner.imports(SAMPLE), vec!["react", "./GeneratedComponent.css"]);
    }

    #[test]
    fn test_exports() {
        let scanner = RegexScanner::new();
        assert_eq!(scanner.exports(SAMPLE), vec!["CardProps", "Card"]);
        assert_eq!(
            scanner.exports("export default function App() {}\nexport const x = 1;"),
            vec!["App", "x"]
        );
    }

    #[test]
    fn test_complexity() {
        let scanner = RegexScanner::new();
        // if, else, &&
        assert_eq!(scanner.complexity(SAMPLE), 4);
        assert_eq!(scanner.complexity("const a = 1;"), 1);
    }

    #[test]
    fn test_duplicate_lines() {
        let scanner = RegexScanner::new();
        let source = "a\n  a\nb\n\n\nb\nb\nc";
        // "a" twice (1 extra), "b" three times (2 extra), blanks ignored
        assert_eq!(scanner.duplicate_lines(source), 3);
    }

    #[test]
    fn test_detect_language() {
        let scanner = RegexScanner::new();
        assert_eq!(scanner.detect_language("Button.tsx"), "typescript");
        assert_eq!(scanner.detect_language("styles.scss"), "scss");
        assert_eq!(scanner.detect_language("LICENSE"), "text");
    }
}
