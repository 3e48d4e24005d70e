//! Output optimization.
//!
//! Applies, in fixed order: tree shaking, code splitting, accessibility
//! enhancement and performance enhancement. The first two follow the
//! config; the last two are triggered by low quality scores.

use std::sync::Arc;

use tracing::debug;
use weft_core::{Framework, FrameworkOutput, GenerationConfig, QualityAssessment};

use crate::patch::{CodePatcher, RegexPatcher};

pub const TREE_SHAKING_APPLIED: &str = "Tree shaking applied";
pub const CODE_SPLITTING_APPLIED: &str = "Code splitting applied";
pub const ACCESSIBILITY_APPLIED: &str = "Accessibility enhancements added";
pub const PERFORMANCE_APPLIED: &str = "Performance optimizations applied";

/// Category score below which the matching enhancement runs.
pub const ENHANCEMENT_THRESHOLD: f64 = 80.0;

/// Conditionally rewrites framework output.
#[derive(Clone)]
pub struct Optimizer {
    patcher: Arc<dyn CodePatcher>,
}

impl Optimizer {
    pub fn new() -> Self {
        Self::with_patcher(Arc::new(RegexPatcher::new()))
    }

    pub fn with_patcher(patcher: Arc<dyn CodePatcher>) -> Self {
        Self { patcher }
    }

    /// Optimize and return the names of applied optimizations in order.
    pub fn optimize(
        &self,
        mut output: FrameworkOutput,
        config: &GenerationConfig,
        quality: &QualityAssessment,
    ) -> (FrameworkOutput, Vec<String>) {
        let name = config.component_name.as_str();
        let mut applied = Vec::new();

        if config.optimization.tree_shaking {
            output.template.side_effects = Some(false);
            output.component_code =
                self.patcher
                    .normalize_exports(&output.component_code, output.framework, name);
            applied.push(TREE_SHAKING_APPLIED.to_string());
        }

        if config.optimization.code_splitting {
            output.additional_files.insert(
                format!("index.{}", config.script_extension()),
                lazy_entry(output.framework, name),
            );
            applied.push(CODE_SPLITTING_APPLIED.to_string());
        }

        if quality.categories.accessibility < ENHANCEMENT_THRESHOLD {
            let patched = self
                .patcher
                .label_buttons(&self.patcher.add_landmark_roles(&output.component_code));
            if patched != output.component_code {
                output.component_code = patched;
                applied.push(ACCESSIBILITY_APPLIED.to_string());
            }
        }

        if quality.categories.performance < ENHANCEMENT_THRESHOLD {
            let patched =
                self.patcher
                    .memoize_component(&output.component_code, output.framework, name);
            if patched != output.component_code {
                output.component_code = patched;
                applied.push(PERFORMANCE_APPLIED.to_string());
            }
        }

        debug!(applied = ?applied, "optimizations applied");
        (output, applied)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer").finish_non_exhaustive()
    }
}

/// Entry module that loads the component on demand.
pub fn lazy_entry(framework: Framework, name: &str) -> String {
    match framework {
        Framework::React => format!(
            "import {{ lazy }} from 'react';\n\nexport const {name} = lazy(() => import('./components/{name}'));"
        ),
        Framework::Vue => format!(
            "import {{ defineAsyncComponent }} from 'vue';\n\nexport const {name} = defineAsyncComponent(() => import('./components/{name}.vue'));"
        ),
        Framework::Angular => format!(
            "export const load{name} = () =>\n  import('./components/{name}').then((m) => m.{name}Component);"
        ),
        Framework::Svelte => {
            format!("export const load{name} = () => import('./components/{name}.svelte');")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{OptimizationConfig, QualityCategories, TemplateDescriptor};

    fn output(framework: Framework, code: &str) -> FrameworkOutput {
        FrameworkOutput {
            framework,
            component_code: code.to_string(),
            style_code: String::new(),
            template: TemplateDescriptor::default(),
            additional_files: Default::default(),
        }
    }

    fn quality(accessibility: f64, performance: f64) -> QualityAssessment {
        QualityAssessment::new(QualityCategories {
            visual: 90.0,
            code: 90.0,
            performance,
            accessibility,
            maintainability: 90.0,
            security: 90.0,
        })
    }

    const REACT: &str = "import React from 'react';\n\nconst GeneratedComponent = () => (\n  <div className=\"component-content\">\n    <button onClick={() => go()}>Go</button>\n  </div>\n);\n\nexport default GeneratedComponent;";

    #[test]
    fn test_nothing_applied_for_good_scores() {
        let (out, applied) = Optimizer::new().optimize(
            output(Framework::React, REACT),
            &GenerationConfig::default(),
            &quality(95.0, 90.0),
        );
        assert!(applied.is_empty());
        assert_eq!(out.component_code, REACT);
    }

    #[test]
    fn test_fixed_order() {
        let config = GenerationConfig {
            optimization: OptimizationConfig {
                tree_shaking: true,
                code_splitting: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (out, applied) =
            Optimizer::new().optimize(output(Framework::React, REACT), &config, &quality(60.0, 75.0));
        assert_eq!(
            applied,
            vec![
                TREE_SHAKING_APPLIED,
                CODE_SPLITTING_APPLIED,
                ACCESSIBILITY_APPLIED,
                PERFORMANCE_APPLIED
            ]
        );
        assert_eq!(out.template.side_effects, Some(false));
        assert!(out.component_code.contains("export const GeneratedComponent = () => ("));
        assert!(out.component_code.contains("role=\"main\""));
        assert!(out.component_code.contains("aria-label=\"Generated button\""));
        assert!(out
            .component_code
            .ends_with("export default React.memo(GeneratedComponent);"));
        assert!(out.additional_files["index.ts"].contains("lazy(() => import('./components/GeneratedComponent'))"));
    }

    #[test]
    fn test_noop_patch_is_not_logged() {
        let (_, applied) = Optimizer::new().optimize(
            output(Framework::Vue, "<template><p>x</p></template>"),
            &GenerationConfig::default(),
            &quality(95.0, 75.0),
        );
        assert!(applied.is_empty());
    }
}
