//! Quality assessment.
//!
//! Six category scores in `0..=100`, each built from a baseline and fixed
//! increments or penalties detected by pattern scanning.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use weft_core::{
    FrameworkOutput, GenerationConfig, Issue, IssueCategory, IssueLevel, QualityAssessment,
    QualityCategories, WcagLevel,
};

/// Performance below this triggers a recommendation.
pub const PERFORMANCE_TARGET: f64 = 90.0;
/// Maintainability below this triggers a recommendation.
pub const MAINTAINABILITY_TARGET: f64 = 90.0;
/// Accessibility below this triggers a recommendation.
pub const ACCESSIBILITY_TARGET: f64 = 95.0;

static MEDIA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@media\b").expect("media query pattern"));

static CSS_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\(--").expect("css variable pattern"));

static LAYOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"display:\s*(grid|flex)").expect("layout pattern"));

static TYPE_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\binterface\s+\w+|\btype\s+\w+\s*=|defineProps<").expect("type declaration pattern")
});

static FUNCTION_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"React\.FC\b|\bfunction\b").expect("function component pattern"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*|//|<!--").expect("comment pattern"));

static A11Y_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"aria-|role=|alt=").expect("accessibility pattern"));

static RAW_HTML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"dangerouslySetInnerHTML|\.innerHTML\s*=|v-html|\[innerHTML\]|\{@html")
        .expect("raw html pattern")
});

static EVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\beval\s*\(|new\s+Function\s*\(").expect("dynamic evaluation pattern")
});

static DOCUMENT_WRITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"document\.write").expect("document.write pattern"));

/// Scores framework output against the generation config.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityAssessor;

impl QualityAssessor {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, output: &FrameworkOutput, config: &GenerationConfig) -> QualityAssessment {
        let code = output.component_code.as_str();
        let styles = output.style_code.as_str();

        let has_types = config.typescript && TYPE_DECL_RE.is_match(code);
        let has_a11y = A11Y_RE.is_match(code);
        let has_responsive = MEDIA_RE.is_match(styles);

        let categories = QualityCategories {
            visual: visual_score(styles),
            code: code_score(code, config),
            performance: performance_score(config),
            accessibility: if has_a11y { 95.0 } else { 60.0 },
            maintainability: maintainability_score(code, config),
            security: security_score(code),
        };
        let mut assessment = QualityAssessment::new(categories);

        if !has_a11y {
            assessment.issues.push(issue(
                IssueLevel::Warning,
                "Missing accessibility attributes",
                IssueCategory::Accessibility,
            ));
        }
        if !config.testing.unit_tests {
            assessment.issues.push(issue(
                IssueLevel::Warning,
                "Unit tests are not configured",
                IssueCategory::Maintainability,
            ));
        }
        let a11y = config.accessibility;
        if a11y.wcag_level == WcagLevel::AAA && !(a11y.screen_reader && a11y.keyboard_navigation) {
            assessment.issues.push(issue(
                IssueLevel::Error,
                "WCAG AAA requires screen reader and keyboard navigation support",
                IssueCategory::Accessibility,
            ));
        }

        let mut recommendations = Vec::new();
        if config.typescript && !has_types {
            recommendations.push("Enable TypeScript for better type safety");
        }
        if !has_responsive {
            recommendations.push("Add responsive design patterns");
        }
        let scores = assessment.categories;
        if scores.performance < PERFORMANCE_TARGET {
            recommendations.push("Enable tree shaking, code splitting and lazy loading");
        }
        if scores.maintainability < MAINTAINABILITY_TARGET {
            recommendations.push("Add comments and unit tests to improve maintainability");
        }
        if scores.accessibility < ACCESSIBILITY_TARGET {
            recommendations.push("Add ARIA labels and landmark roles");
        }
        assessment.extend_recommendations(recommendations.into_iter().map(String::from));

        debug!(
            overall = assessment.overall(),
            issues = assessment.issues.len(),
            "quality assessed"
        );
        assessment
    }
}

fn visual_score(styles: &str) -> f64 {
    let mut score = 80.0;
    if MEDIA_RE.is_match(styles) {
        score += 10.0;
    }
    if CSS_VAR_RE.is_match(styles) {
        score += 5.0;
    }
    if LAYOUT_RE.is_match(styles) {
        score += 5.0;
    }
    score
}

fn code_score(code: &str, config: &GenerationConfig) -> f64 {
    let mut score = 70.0;
    if config.typescript && TYPE_DECL_RE.is_match(code) {
        score += 15.0;
    }
    if FUNCTION_STYLE_RE.is_match(code) {
        score += 10.0;
    }
    if COMMENT_RE.is_match(code) {
        score += 5.0;
    }
    score
}

/// Baseline 75 plus a fixed increment per enabled optimization.
pub fn performance_score(config: &GenerationConfig) -> f64 {
    let opt = config.optimization;
    let mut score: f64 = 75.0;
    if opt.tree_shaking {
        score += 8.0;
    }
    if opt.code_splitting {
        score += 8.0;
    }
    if opt.lazy_loading {
        score += 9.0;
    }
    if opt.bundle_analysis {
        score += 5.0;
    }
    score.min(100.0)
}

fn maintainability_score(code: &str, config: &GenerationConfig) -> f64 {
    let comments = if COMMENT_RE.is_match(code) { 40.0 } else { 20.0 };
    let typed = if config.typescript && TYPE_DECL_RE.is_match(code) { 30.0 } else { 10.0 };
    let tests = if config.testing.unit_tests { 30.0 } else { 0.0 };
    comments + typed + tests
}

fn security_score(code: &str) -> f64 {
    let mut score: f64 = 90.0;
    if RAW_HTML_RE.is_match(code) {
        score -= 20.0;
    }
    if EVAL_RE.is_match(code) {
        score -= 30.0;
    }
    if DOCUMENT_WRITE_RE.is_match(code) {
        score -= 25.0;
    }
    score.max(0.0)
}

fn issue(level: IssueLevel, message: &str, category: IssueCategory) -> Issue {
    Issue {
        level,
        message: message.to_string(),
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use weft_core::{AccessibilityConfig, Framework, OptimizationConfig, TemplateDescriptor};

    fn output(code: &str, styles: &str) -> FrameworkOutput {
        FrameworkOutput {
            framework: Framework::React,
            component_code: code.to_string(),
            style_code: styles.to_string(),
            template: TemplateDescriptor::default(),
            additional_files: Default::default(),
        }
    }

    #[test]
    fn test_baseline_scores() {
        let config = GenerationConfig {
            typescript: false,
            ..Default::default()
        };
        let q = QualityAssessor::new().assess(&output("const A = 1;", ".a {}"), &config);
        assert_eq!(q.categories.visual, 80.0);
        assert_eq!(q.categories.code, 70.0);
        assert_eq!(q.categories.performance, 75.0);
        assert_eq!(q.categories.accessibility, 60.0);
        assert_eq!(q.categories.maintainability, 30.0);
        assert_eq!(q.categories.security, 90.0);
        assert!(q
            .issues
            .iter()
            .any(|i| i.message == "Missing accessibility attributes"));
        assert!(q
            .recommendations
            .contains(&"Add responsive design patterns".to_string()));
    }

    #[test]
    fn test_full_marks() {
        let config = GenerationConfig {
            optimization: OptimizationConfig {
                tree_shaking: true,
                code_splitting: true,
                lazy_loading: true,
                bundle_analysis: true,
            },
            testing: weft_core::TestingConfig {
                unit_tests: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let code = "// c\ninterface P {}\nconst A: React.FC<P> = () => <img alt=\"x\" />;";
        let styles = ".a { display: flex; color: var(--c); }\n@media (max-width: 768px) {}";
        let q = QualityAssessor::new().assess(&output(code, styles), &config);
        assert_eq!(q.categories.visual, 100.0);
        assert_eq!(q.categories.code, 100.0);
        assert_eq!(q.categories.performance, 100.0);
        assert_eq!(q.categories.accessibility, 95.0);
        assert_eq!(q.categories.maintainability, 100.0);
        assert!(q.issues.is_empty());
        assert!(q.recommendations.is_empty());
    }

    #[test]
    fn test_performance_increments_and_cap() {
        let mut config = GenerationConfig::default();
        config.optimization = OptimizationConfig {
            tree_shaking: true,
            lazy_loading: true,
            ..Default::default()
        };
        assert_eq!(performance_score(&config), 92.0);

        config.optimization.code_splitting = true;
        config.optimization.bundle_analysis = true;
        assert_eq!(performance_score(&config), 100.0);
    }

    #[test]
    fn test_security_penalties() {
        let code = "<div dangerouslySetInnerHTML={{ __html: x }} />; eval(y);";
        let q = QualityAssessor::new().assess(&output(code, ""), &GenerationConfig::default());
        assert_eq!(q.categories.security, 40.0);

        let worst = "el.innerHTML = a; eval(b); document.write(c);";
        let q = QualityAssessor::new().assess(&output(worst, ""), &GenerationConfig::default());
        assert_eq!(q.categories.security, 15.0);
    }

    #[test]
    fn test_aaa_without_support_is_error() {
        let config = GenerationConfig {
            accessibility: AccessibilityConfig {
                wcag_level: WcagLevel::AAA,
                screen_reader: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let q = QualityAssessor::new().assess(&output("", ""), &config);
        assert!(q
            .issues
            .iter()
            .any(|i| i.level == IssueLevel::Error && i.category == IssueCategory::Accessibility));
    }

    proptest! {
        #[test]
        fn test_scores_bounded(code in ".{0,200}", styles in ".{0,100}", ts: bool, tests: bool) {
            let config = GenerationConfig {
                typescript: ts,
                testing: weft_core::TestingConfig { unit_tests: tests, ..Default::default() },
                ..Default::default()
            };
            let q = QualityAssessor::new().assess(&output(&code, &styles), &config);
            for score in q.categories.scores() {
                prop_assert!((0.0..=100.0).contains(&score));
            }
            prop_assert!((q.overall() - q.categories.mean()).abs() < 1e-9);
        }
    }
}
