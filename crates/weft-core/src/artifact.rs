//! Records produced by the later pipeline phases.

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::{Framework, GenerationConfig};

/// Design pattern reported by a pattern analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPattern {
    /// Pattern classification.
    pub kind: PatternKind,
    /// ID of the node the pattern was found on.
    pub node_id: String,
    /// Classifier confidence in `0.0..=1.0`.
    pub confidence: f64,
    /// Design suggestions.
    pub suggestions: Vec<String>,
    /// Accessibility findings.
    pub accessibility: Vec<AccessibilityInsight>,
}

/// Pattern classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Card,
    Button,
    Form,
    Navigation,
    Header,
    Footer,
    Sidebar,
    Modal,
}

impl PatternKind {
    /// Patterns that imply user interaction.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Button | Self::Form | Self::Navigation | Self::Modal)
    }
}

/// One accessibility finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityInsight {
    pub level: InsightLevel,
    pub message: String,
    pub fix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Error,
    Warning,
    Suggestion,
}

/// Framework-specific source produced by a framework adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkOutput {
    /// Target framework.
    pub framework: Framework,
    /// Main component source.
    pub component_code: String,
    /// Stylesheet source; empty when styling is inlined.
    pub style_code: String,
    /// Package template for the generated code.
    pub template: TemplateDescriptor,
    /// Extra files keyed by path relative to the source root.
    #[serde(default)]
    pub additional_files: IndexMap<String, String>,
}

/// Package-level description of generated code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    /// Runtime dependencies.
    pub dependencies: Vec<String>,
    /// Development dependencies.
    pub dev_dependencies: Vec<String>,
    /// Package `sideEffects` flag, set when tree shaking is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<bool>,
}

/// The six scored quality categories, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityCategories {
    pub visual: f64,
    pub code: f64,
    pub performance: f64,
    pub accessibility: f64,
    pub maintainability: f64,
    pub security: f64,
}

impl QualityCategories {
    /// All scores in declaration order.
    pub fn scores(&self) -> [f64; 6] {
        [
            self.visual,
            self.code,
            self.performance,
            self.accessibility,
            self.maintainability,
            self.security,
        ]
    }

    /// Unweighted arithmetic mean.
    pub fn mean(&self) -> f64 {
        self.scores().iter().sum::<f64>() / 6.0
    }

    /// Copy with every score clamped to `0..=100`.
    pub fn clamped(self) -> Self {
        let c = |v: f64| v.clamp(0.0, 100.0);
        Self {
            visual: c(self.visual),
            code: c(self.code),
            performance: c(self.performance),
            accessibility: c(self.accessibility),
            maintainability: c(self.maintainability),
            security: c(self.security),
        }
    }
}

/// Quality scores, issues and recommendations for one generation.
///
/// `overall` is derived from `categories` whenever it is read or
/// serialized; it is never stored.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QualityAssessment {
    pub categories: QualityCategories,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl QualityAssessment {
    pub fn new(categories: QualityCategories) -> Self {
        Self {
            categories: categories.clamped(),
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Mean of the six category scores.
    pub fn overall(&self) -> f64 {
        self.categories.mean()
    }

    /// Append recommendations not already present.
    pub fn extend_recommendations<I>(&mut self, extra: I)
    where
        I: IntoIterator<Item = String>,
    {
        for rec in extra {
            if !self.recommendations.contains(&rec) {
                self.recommendations.push(rec);
            }
        }
    }
}

impl Serialize for QualityAssessment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QualityAssessment", 4)?;
        state.serialize_field("overall", &self.overall())?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("issues", &self.issues)?;
        state.serialize_field("recommendations", &self.recommendations)?;
        state.end()
    }
}

/// A quality issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub level: IssueLevel,
    pub message: String,
    pub category: IssueCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Visual,
    Code,
    Performance,
    Accessibility,
    Maintainability,
    Security,
}

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    /// Path including the source root.
    pub path: String,
    /// File name.
    pub name: String,
    /// Extension with leading dot.
    pub extension: String,
    pub content: String,
    /// Byte length of `content`.
    pub size: usize,
    /// Language tag.
    pub language: String,
    /// Imported module specifiers.
    pub imports: Vec<String>,
    /// Exported names.
    pub exports: Vec<String>,
    /// Declared package dependencies.
    pub dependencies: Vec<String>,
}

/// Planned project layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub root: String,
    pub components: Vec<String>,
    pub hooks: Vec<String>,
    pub utils: Vec<String>,
    pub types: Vec<String>,
    pub styles: Vec<String>,
    pub tests: Vec<String>,
    pub assets: Vec<String>,
}

/// Code metrics over the emitted file set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetrics {
    pub lines_of_code: usize,
    pub complexity: usize,
    pub maintainability_index: f64,
    pub duplicate_lines: usize,
    pub test_coverage: f64,
    /// Sum of file sizes in bytes.
    pub bundle_size: usize,
    /// Size after comment and whitespace stripping.
    pub minified_size: usize,
    /// Wall-clock time since the session started.
    pub load_time_ms: u64,
    /// Download estimate at 1.5 MB/s.
    pub estimated_load_time_ms: f64,
    pub performance_score: f64,
}

/// One build validation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLog {
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Aggregate build status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Success,
    Warning,
    Error,
}

impl BuildStatus {
    /// `Error` if any log is an error, else `Warning` if any is a warning.
    pub fn from_logs(logs: &[BuildLog]) -> Self {
        if logs.iter().any(|l| l.level == LogLevel::Error) {
            Self::Error
        } else if logs.iter().any(|l| l.level == LogLevel::Warn) {
            Self::Warning
        } else {
            Self::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    /// Session ID that produced this artifact.
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub config: GenerationConfig,
    pub files: Vec<CodeFile>,
    pub structure: ProjectStructure,
    pub metrics: CodeMetrics,
    pub quality: QualityAssessment,
    /// HTML preview page.
    pub preview: String,
    pub build_status: BuildStatus,
    pub build_logs: Vec<BuildLog>,
    /// Names of applied optimizations, in application order.
    pub optimizations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn log(level: LogLevel) -> BuildLog {
        BuildLog {
            timestamp: 0,
            level,
            message: String::new(),
            file: None,
        }
    }

    #[test]
    fn test_build_status_from_logs() {
        assert_eq!(BuildStatus::from_logs(&[log(LogLevel::Info)]), BuildStatus::Success);
        assert_eq!(
            BuildStatus::from_logs(&[log(LogLevel::Info), log(LogLevel::Warn)]),
            BuildStatus::Warning
        );
        assert_eq!(
            BuildStatus::from_logs(&[log(LogLevel::Warn), log(LogLevel::Error)]),
            BuildStatus::Error
        );
        assert_eq!(BuildStatus::from_logs(&[]), BuildStatus::Success);
    }

    #[test]
    fn test_overall_is_serialized_from_categories() {
        let quality = QualityAssessment::new(QualityCategories {
            visual: 90.0,
            code: 80.0,
            performance: 70.0,
            accessibility: 60.0,
            maintainability: 50.0,
            security: 40.0,
        });
        let json = serde_json::to_value(&quality).unwrap();
        assert_eq!(json["overall"], 65.0);
    }

    #[test]
    fn test_extend_recommendations_dedups() {
        let mut quality = QualityAssessment::default();
        quality.extend_recommendations(vec!["a".to_string(), "b".to_string()]);
        quality.extend_recommendations(vec!["b".to_string(), "c".to_string()]);
        assert_eq!(quality.recommendations, vec!["a", "b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_clamped_scores_in_bounds(values in proptest::array::uniform6(-500.0f64..500.0)) {
            let quality = QualityAssessment::new(QualityCategories {
                visual: values[0],
                code: values[1],
                performance: values[2],
                accessibility: values[3],
                maintainability: values[4],
                security: values[5],
            });
            for score in quality.categories.scores() {
                prop_assert!((0.0..=100.0).contains(&score));
            }
            let mean = quality.categories.scores().iter().sum::<f64>() / 6.0;
            prop_assert!((quality.overall() - mean).abs() < 1e-9);
        }
    }
}
