//! Component synthesis.

use std::sync::Arc;

use tracing::{debug, warn};
use weft_core::{ComponentIr, ComponentPlan, DesignPattern, Framework, GenerationConfig};
use weft_dispatch::Dispatcher;
use weft_extract::{DesignTokenSet, NormalizedScene};

use crate::plan::build_plan;
use crate::render::render;
use crate::tasks::{parse_markup, rewrite_syntax};

/// Builds the framework-neutral component for a scene.
///
/// Rendering, structural checking and syntax rewriting go through the
/// dispatcher when one is attached. Any dispatch failure falls back to the
/// same functions run in-process, so synthesis itself never fails.
#[derive(Debug, Clone, Default)]
pub struct ComponentSynthesizer {
    dispatcher: Option<Arc<Dispatcher>>,
}

impl ComponentSynthesizer {
    /// Synthesizer that renders in-process.
    pub fn new() -> Self {
        Self { dispatcher: None }
    }

    /// Synthesizer that renders on a dispatcher.
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
        }
    }

    pub async fn synthesize(
        &self,
        scene: &NormalizedScene,
        tokens: &DesignTokenSet,
        patterns: &[DesignPattern],
        config: &GenerationConfig,
    ) -> ComponentIr {
        let plan = build_plan(scene, tokens, patterns, config);
        debug!(
            elements = plan.elements.len(),
            interactive = plan.interactive,
            "component planned"
        );

        let mut ir = self.render(&plan).await;
        if !self.is_well_formed(&ir.template).await {
            warn!(component = %plan.component_name, "rendered markup is unbalanced, using fallback body");
            let fallback = ComponentPlan {
                elements: Vec::new(),
                ..plan
            };
            ir = render(&fallback);
        }

        if config.framework != Framework::React {
            ir.template = self.rewrite(&ir.template, config.framework).await;
        }
        ir
    }

    async fn render(&self, plan: &ComponentPlan) -> ComponentIr {
        if let Some(dispatcher) = &self.dispatcher {
            match dispatcher.render(plan.clone()).await {
                Ok(ir) => return ir,
                Err(err) => warn!(error = %err, "render task failed, rendering locally"),
            }
        }
        render(plan)
    }

    async fn is_well_formed(&self, template: &str) -> bool {
        if let Some(dispatcher) = &self.dispatcher {
            match dispatcher.parse_scene(template).await {
                Ok(summary) => return summary.balanced,
                Err(err) => warn!(error = %err, "parse-scene task failed, parsing locally"),
            }
        }
        parse_markup(template).balanced
    }

    async fn rewrite(&self, code: &str, framework: Framework) -> String {
        if let Some(dispatcher) = &self.dispatcher {
            match dispatcher.rewrite(code, framework).await {
                Ok(rewritten) => return rewritten,
                Err(err) => warn!(error = %err, %framework, "rewrite task failed, rewriting locally"),
            }
        }
        rewrite_syntax(code, framework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use weft_core::{DesignDocument, DesignNode, NodeKind, Paint};
    use weft_dispatch::{TaskFailure, TaskOutput, TaskRequest};
    use weft_extract::DesignExtractor;

    use crate::analyzer::HeuristicAnalyzer;
    use crate::tasks::CodeTasks;

    fn design() -> DesignNode {
        DesignNode::new(NodeKind::Frame, "Promo")
            .with_bounds(0.0, 0.0, 300.0, 200.0)
            .with_child(DesignNode::new(NodeKind::Text, "h3").with_text("Sale"))
            .with_child(
                DesignNode::new(NodeKind::Frame, "Buy Button")
                    .with_bounds(0.0, 100.0, 120.0, 44.0)
                    .with_fill(Paint::solid(0.0, 0.0, 0.0, 1.0))
                    .with_child(DesignNode::new(NodeKind::Text, "Label").with_text("Buy")),
            )
    }

    async fn synthesize_with(synth: &ComponentSynthesizer, config: &GenerationConfig) -> ComponentIr {
        let root = design();
        let (scene, tokens) = DesignExtractor::new().extract(&DesignDocument::new(root.clone()));
        let patterns = HeuristicAnalyzer::new().recognize(&root);
        synth.synthesize(&scene, &tokens, &patterns, config).await
    }

    #[tokio::test]
    async fn test_local_and_dispatched_agree() {
        let config = GenerationConfig::default();
        let local = synthesize_with(&ComponentSynthesizer::new(), &config).await;

        let dispatcher = Arc::new(Dispatcher::spawn(CodeTasks::new()).unwrap());
        let remote = synthesize_with(&ComponentSynthesizer::with_dispatcher(dispatcher), &config).await;

        assert_eq!(local, remote);
        assert!(local.interactive);
        assert!(local.markup.contains("<h3 className=\"text-element-0\">Sale</h3>"));
    }

    #[tokio::test]
    async fn test_failing_dispatcher_falls_back() {
        let failing = |_req: TaskRequest| -> Result<TaskOutput, TaskFailure> {
            Err(TaskFailure::new("worker broken"))
        };
        let dispatcher = Arc::new(Dispatcher::with_timeout(failing, Duration::from_secs(5)).unwrap());
        let config = GenerationConfig::default();

        let ir = synthesize_with(&ComponentSynthesizer::with_dispatcher(dispatcher), &config).await;
        let local = synthesize_with(&ComponentSynthesizer::new(), &config).await;
        assert_eq!(ir, local);
    }

    #[tokio::test]
    async fn test_template_rewritten_for_target() {
        let config = GenerationConfig {
            framework: Framework::Svelte,
            ..Default::default()
        };
        let ir = synthesize_with(&ComponentSynthesizer::new(), &config).await;
        assert!(ir.template.contains("on:click={handleClick}"));
        assert!(!ir.template.contains("className="));
        // markup stays JSX-flavored
        assert!(ir.markup.contains("className="));
    }
}
