//! Final assembly: file set, metrics, preview and build validation.

use std::sync::{Arc, LazyLock};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};
use weft_core::{
    BuildLog, CodeFile, CodeMetrics, FrameworkOutput, GenerationConfig, LogLevel,
    ProjectStructure, RegexScanner, SourceScanner,
};
use weft_dispatch::{Dispatcher, OptimizeOptions, ValidationReport};
use weft_extract::NormalizedScene;

use crate::error::Result;
use crate::quality::performance_score;
use crate::tasks::{optimize_source, validate_source};
use crate::templates::TemplateEngine;

/// Assumed download bandwidth for the load-time estimate, in bytes per second.
pub const BYTES_PER_SECOND: f64 = 1_500_000.0;

/// Characters of component source shown in the preview.
pub const PREVIEW_SNIPPET_CHARS: usize = 200;

pub const BUILD_OK_MESSAGE: &str = "Build validation completed successfully";

const PREVIEW_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Generated Component Preview</title>
    <style>
        body { font-family: Arial, sans-serif; padding: 20px; }
        .preview { border: 1px solid #ddd; padding: 20px; border-radius: 8px; }
    </style>
</head>
<body>
    <div class="preview">
        <h2>Component Preview</h2>
        <p>This is a preview of your generated component.</p>
        {{{svg}}}
        <pre><code>{{html snippet}}...</code></pre>
    </div>
</body>
</html>"#;

static REACT_API_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"React\.|\buseState\b|\buseEffect\b").expect("react api pattern"));

static INTERFACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binterface\s+\w+").expect("interface pattern"));

#[derive(Serialize)]
struct PreviewData<'a> {
    svg: &'a str,
    snippet: String,
}

/// Assembled file set with its derived records.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub files: Vec<CodeFile>,
    pub structure: ProjectStructure,
    pub metrics: CodeMetrics,
    pub preview: String,
}

/// Packages optimized output into files and validates the result.
pub struct Assembler {
    dispatcher: Option<Arc<Dispatcher>>,
    scanner: Arc<dyn SourceScanner>,
    engine: TemplateEngine<'static>,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            dispatcher: None,
            scanner: Arc::new(RegexScanner::new()),
            engine: TemplateEngine::new(),
        }
    }

    /// Run size and lint tasks through a dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn SourceScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    /// Build the file set, metrics and preview.
    ///
    /// `started` is the session start; its elapsed time is the load time.
    pub async fn assemble(
        &self,
        output: &FrameworkOutput,
        structure: ProjectStructure,
        scene: &NormalizedScene,
        config: &GenerationConfig,
        started: Instant,
    ) -> Result<Assembly> {
        let files = self.files(output, &structure, config);
        let preview = self.preview(&output.component_code, scene)?;
        let metrics = self.metrics(&files, config, started).await;

        debug!(
            files = files.len(),
            bundle_size = metrics.bundle_size,
            "assembled"
        );

        Ok(Assembly {
            files,
            structure,
            metrics,
            preview,
        })
    }

    /// One component file, the stylesheet when non-empty, then declared files.
    pub fn files(
        &self,
        output: &FrameworkOutput,
        structure: &ProjectStructure,
        config: &GenerationConfig,
    ) -> Vec<CodeFile> {
        let root = structure.root.as_str();
        let name = config.component_name.as_str();
        let mut files = Vec::new();

        let component_path = format!(
            "{}/components/{}.{}",
            root,
            name,
            output.framework.component_extension(config.typescript)
        );
        let mut component = self.code_file(
            component_path,
            &output.component_code,
            output.template.dependencies.clone(),
        );
        if component.exports.is_empty() {
            component.exports.push(name.to_string());
        }
        files.push(component);

        if !output.style_code.trim().is_empty() {
            let style_path = format!("{}/styles/{}.{}", root, name, config.styling.extension());
            files.push(self.code_file(style_path, &output.style_code, Vec::new()));
        }

        for (path, content) in &output.additional_files {
            files.push(self.code_file(format!("{}/{}", root, path), content, Vec::new()));
        }

        files
    }

    fn code_file(&self, path: String, content: &str, dependencies: Vec<String>) -> CodeFile {
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let extension = name
            .rfind('.')
            .map(|at| name[at..].to_string())
            .unwrap_or_default();
        CodeFile {
            language: self.scanner.detect_language(&name).to_string(),
            imports: self.scanner.imports(content),
            exports: self.scanner.exports(content),
            size: content.len(),
            content: content.to_string(),
            dependencies,
            extension,
            name,
            path,
        }
    }

    /// HTML page with the scene drawing and the head of the component source.
    pub fn preview(&self, component_code: &str, scene: &NormalizedScene) -> Result<String> {
        let svg = scene.to_svg();
        let data = PreviewData {
            svg: &svg,
            snippet: component_code.chars().take(PREVIEW_SNIPPET_CHARS).collect(),
        };
        self.engine.render_string(PREVIEW_TEMPLATE, &data)
    }

    /// Metrics over the whole file set.
    pub async fn metrics(
        &self,
        files: &[CodeFile],
        config: &GenerationConfig,
        started: Instant,
    ) -> CodeMetrics {
        let total: String = files
            .iter()
            .map(|f| f.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let lines_of_code = files.iter().map(|f| f.content.split('\n').count()).sum();
        let complexity = self.scanner.complexity(&total);
        let bundle_size: usize = files.iter().map(|f| f.size).sum();

        let mut minified_size = 0;
        for file in files {
            minified_size += self.minified_size(file).await;
        }

        CodeMetrics {
            lines_of_code,
            complexity,
            maintainability_index: maintainability_index(complexity, lines_of_code),
            duplicate_lines: self.scanner.duplicate_lines(&total),
            test_coverage: 0.0,
            bundle_size,
            minified_size,
            load_time_ms: started.elapsed().as_millis() as u64,
            estimated_load_time_ms: bundle_size as f64 / BYTES_PER_SECOND * 1000.0,
            performance_score: performance_score(config),
        }
    }

    async fn minified_size(&self, file: &CodeFile) -> usize {
        let options = OptimizeOptions {
            remove_comments: file.language != "markdown",
            remove_unused_imports: false,
            minify_css: matches!(file.language.as_str(), "css" | "scss"),
        };
        if let Some(dispatcher) = &self.dispatcher {
            match dispatcher.optimize(file.content.as_str(), options).await {
                Ok(report) => return report.optimized_size,
                Err(err) => warn!(error = %err, file = %file.name, "optimize task failed, sizing locally"),
            }
        }
        optimize_source(&file.content, options).optimized_size
    }

    /// Heuristic build checks; always returns at least one entry.
    pub async fn validate_build(&self, files: &[CodeFile], config: &GenerationConfig) -> Vec<BuildLog> {
        let timestamp = now_millis();
        let mut logs = Vec::new();
        let mut log = |level: LogLevel, message: String, file: &CodeFile| {
            logs.push(BuildLog {
                timestamp,
                level,
                message,
                file: Some(file.name.clone()),
            });
        };

        for file in files {
            let content = file.content.as_str();
            let jsx = matches!(file.extension.as_str(), ".tsx" | ".jsx");

            if jsx && REACT_API_RE.is_match(content) && !file.imports.iter().any(|i| i == "react") {
                log(LogLevel::Warn, "Potentially missing import: react".to_string(), file);
            }

            if config.typescript && file.extension == ".tsx" {
                if content.contains(": React.FC") && !content.contains("import React") {
                    log(LogLevel::Error, "React import missing for React.FC type".to_string(), file);
                }
                if INTERFACE_RE.is_match(content) && !content.contains("export") {
                    log(LogLevel::Error, "Interface defined but not exported".to_string(), file);
                }
            }
        }

        if let Some(component) = files.first().filter(|f| f.extension != ".vue") {
            let report = self.lint(&component.content).await;
            for message in report.errors {
                log(LogLevel::Error, message, component);
            }
            for message in report.warnings {
                log(LogLevel::Warn, message, component);
            }
        }

        if logs.is_empty() {
            logs.push(BuildLog {
                timestamp,
                level: LogLevel::Info,
                message: BUILD_OK_MESSAGE.to_string(),
                file: None,
            });
        }
        logs
    }

    async fn lint(&self, code: &str) -> ValidationReport {
        if let Some(dispatcher) = &self.dispatcher {
            match dispatcher.validate(code).await {
                Ok(report) => return report,
                Err(err) => warn!(error = %err, "validate task failed, validating locally"),
            }
        }
        validate_source(code)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assembler")
            .field("dispatched", &self.dispatcher.is_some())
            .finish_non_exhaustive()
    }
}

/// `100 - 2 * complexity - lines / 10`, clamped to `0..=100`.
pub fn maintainability_index(complexity: usize, lines_of_code: usize) -> f64 {
    (100.0 - complexity as f64 * 2.0 - lines_of_code as f64 / 10.0).clamp(0.0, 100.0)
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{BuildStatus, DesignDocument, Framework, TemplateDescriptor};
    use weft_extract::DesignExtractor;

    use crate::tasks::CodeTasks;

    const COMPONENT: &str = "import React from 'react';\nimport '../styles/Card.css';\n\ninterface CardProps {\n  className?: string;\n}\n\nconst Card: React.FC<CardProps> = ({ className = '' }) => {\n  return <div className={className}>Card</div>;\n};\n\nexport default Card;";

    fn config() -> GenerationConfig {
        GenerationConfig {
            component_name: "Card".into(),
            ..Default::default()
        }
    }

    fn output(code: &str, styles: &str) -> FrameworkOutput {
        let mut additional_files = indexmap::IndexMap::new();
        additional_files.insert(
            "types/Card.types.ts".to_string(),
            "export interface CardProps {}".to_string(),
        );
        FrameworkOutput {
            framework: Framework::React,
            component_code: code.to_string(),
            style_code: styles.to_string(),
            template: TemplateDescriptor {
                dependencies: vec!["react".into(), "react-dom".into()],
                ..Default::default()
            },
            additional_files,
        }
    }

    fn structure() -> ProjectStructure {
        ProjectStructure {
            root: "src".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_file_set() {
        let files = Assembler::new().files(&output(COMPONENT, ".card {}"), &structure(), &config());
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["src/components/Card.tsx", "src/styles/Card.css", "src/types/Card.types.ts"]
        );

        let component = &files[0];
        assert_eq!(component.name, "Card.tsx");
        assert_eq!(component.extension, ".tsx");
        assert_eq!(component.language, "typescript");
        assert_eq!(component.size, COMPONENT.len());
        assert_eq!(component.imports, vec!["react", "../styles/Card.css"]);
        assert_eq!(component.exports, vec!["Card"]);
        assert_eq!(component.dependencies, vec!["react", "react-dom"]);
        assert_eq!(files[2].exports, vec!["CardProps"]);
    }

    #[test]
    fn test_empty_stylesheet_is_not_emitted() {
        let files = Assembler::new().files(&output(COMPONENT, "  \n"), &structure(), &config());
        assert!(files.iter().all(|f| f.extension != ".css"));
    }

    #[test]
    fn test_maintainability_index() {
        assert_eq!(maintainability_index(1, 10), 97.0);
        assert_eq!(maintainability_index(60, 10), 0.0);
    }

    #[test]
    fn test_preview() {
        let (scene, _) = DesignExtractor::new().extract(&DesignDocument::empty());
        let code = "<div>".repeat(60);
        let preview = Assembler::new().preview(&code, &scene).unwrap();
        assert!(preview.contains("<title>Generated Component Preview</title>"));
        assert!(preview.contains("<svg"));
        assert!(preview.contains(&format!("<pre><code>{}...</code></pre>", "&lt;div&gt;".repeat(40))));
    }

    #[tokio::test]
    async fn test_metrics() {
        let assembler = Assembler::new();
        let files = assembler.files(&output(COMPONENT, ".card {\n  color: red;\n}"), &structure(), &config());
        let metrics = assembler.metrics(&files, &config(), Instant::now()).await;

        assert_eq!(metrics.lines_of_code, 12 + 3 + 1);
        assert_eq!(metrics.bundle_size, files.iter().map(|f| f.size).sum::<usize>());
        assert!(metrics.minified_size < metrics.bundle_size);
        assert_eq!(metrics.test_coverage, 0.0);
        assert_eq!(metrics.performance_score, 75.0);
        assert!(
            (metrics.estimated_load_time_ms - metrics.bundle_size as f64 / 1500.0).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn test_clean_build() {
        let assembler = Assembler::new();
        let files = assembler.files(&output(COMPONENT, ""), &structure(), &config());
        let logs = assembler.validate_build(&files, &config()).await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, BUILD_OK_MESSAGE);
        assert_eq!(BuildStatus::from_logs(&logs), BuildStatus::Success);
    }

    #[tokio::test]
    async fn test_build_problems() {
        let code = "interface P {}\nconst Card: React.FC<P> = () => {\n  const [a] = useState(false);\n  return null;\n};";
        let assembler =
            Assembler::new().with_dispatcher(Arc::new(Dispatcher::spawn(CodeTasks::new()).unwrap()));
        let files = assembler.files(&output(code, ""), &structure(), &config());
        let logs = assembler.validate_build(&files, &config()).await;
        let messages: Vec<_> = logs.iter().map(|l| (l.level, l.message.as_str())).collect();

        assert!(messages.contains(&(LogLevel::Warn, "Potentially missing import: react")));
        assert!(messages.contains(&(LogLevel::Error, "React import missing for React.FC type")));
        assert!(messages.contains(&(LogLevel::Error, "Interface defined but not exported")));
        assert!(messages.contains(&(LogLevel::Warn, "No exports found")));
        assert_eq!(BuildStatus::from_logs(&logs), BuildStatus::Error);
        assert!(logs.iter().all(|l| l.file.as_deref() == Some("Card.tsx")));
    }

    #[tokio::test]
    async fn test_long_component_is_a_warning() {
        let mut code = String::from("import React from 'react';\n\nconst Card = () => {\n");
        for i in 0..60 {
            code.push_str(&format!("  const v{i} = {i};\n"));
        }
        code.push_str("  return null;\n};\n\nexport default Card;");

        let assembler = Assembler::new();
        let files = assembler.files(&output(&code, ""), &structure(), &config());
        let logs = assembler.validate_build(&files, &config()).await;

        assert!(logs
            .iter()
            .any(|l| l.level == LogLevel::Warn && l.message.starts_with("Long function:")));
        assert!(logs.iter().all(|l| l.message != BUILD_OK_MESSAGE));
        assert_eq!(BuildStatus::from_logs(&logs), BuildStatus::Warning);
    }
}
