//! Framework adaptation.
//!
//! Turns a rendered [`ComponentIr`] into framework-specific source plus a
//! package template and any additional declared files.

mod angular;
mod files;
mod react;
mod svelte;
mod vue;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use weft_core::{ComponentIr, Framework, FrameworkOutput, GenerationConfig, Styling, TemplateDescriptor};

use crate::error::Result;
use crate::render::root_class;
use crate::templates::TemplateEngine;

/// Translates component IR into a target framework's syntax.
#[async_trait]
pub trait FrameworkAdapter: Send + Sync {
    async fn adapt(&self, ir: &ComponentIr, config: &GenerationConfig) -> Result<FrameworkOutput>;
}

/// Template-driven adapter covering React, Vue, Angular and Svelte.
pub struct SyntaxAdapter {
    engine: TemplateEngine<'static>,
}

impl SyntaxAdapter {
    pub fn new() -> Self {
        Self {
            engine: TemplateEngine::new(),
        }
    }

    /// Adapt synchronously.
    pub fn adapt_sync(&self, ir: &ComponentIr, config: &GenerationConfig) -> Result<FrameworkOutput> {
        let ctx = AdapterContext::new(ir, config);

        let component_code = match config.framework {
            Framework::React => react::component(ir, &ctx),
            Framework::Vue => vue::component(&self.engine, &ctx)?,
            Framework::Angular => angular::component(&self.engine, &ctx)?,
            Framework::Svelte => svelte::component(&self.engine, &ctx)?,
        };

        let mut additional_files = IndexMap::new();
        if config.typescript {
            additional_files.insert(
                format!("types/{}.types.ts", ctx.name),
                files::types_file(&ctx),
            );
        }
        if config.testing.unit_tests {
            let (ext, content) = match config.framework {
                Framework::React => (if config.typescript { "tsx" } else { "jsx" }, react::test_file(&ctx)),
                Framework::Vue => (config.script_extension(), vue::test_file(&ctx)),
                Framework::Angular => (config.script_extension(), angular::test_file(&ctx)),
                Framework::Svelte => (config.script_extension(), svelte::test_file(&ctx)),
            };
            additional_files.insert(format!("__tests__/{}.test.{}", ctx.name, ext), content);
        }

        let template = template_descriptor(config);
        if config.documentation {
            additional_files.insert(
                "README.md".to_string(),
                files::readme(&self.engine, &ctx, config.framework, &template)?,
            );
        }

        debug!(
            framework = %config.framework,
            extra_files = additional_files.len(),
            "component adapted"
        );

        Ok(FrameworkOutput {
            framework: config.framework,
            component_code,
            style_code: ir.stylesheet.clone(),
            template,
            additional_files,
        })
    }
}

impl Default for SyntaxAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SyntaxAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxAdapter").finish_non_exhaustive()
    }
}

#[async_trait]
impl FrameworkAdapter for SyntaxAdapter {
    async fn adapt(&self, ir: &ComponentIr, config: &GenerationConfig) -> Result<FrameworkOutput> {
        self.adapt_sync(ir, config)
    }
}

/// Values shared by every framework template.
#[derive(Debug, Clone, Serialize)]
struct AdapterContext<'a> {
    name: &'a str,
    root_class: String,
    body: &'a str,
    typescript: bool,
    interactive: bool,
    has_click: bool,
    scss: bool,
    style_path: String,
    component_ext: &'static str,
}

impl<'a> AdapterContext<'a> {
    fn new(ir: &'a ComponentIr, config: &GenerationConfig) -> Self {
        Self {
            name: &ir.component_name,
            root_class: root_class(&ir.component_name),
            body: &ir.template,
            typescript: config.typescript,
            interactive: ir.interactive,
            has_click: ir.template.contains("handleClick"),
            scss: config.styling == Styling::Scss,
            style_path: format!("../styles/{}.{}", ir.component_name, config.styling.extension()),
            component_ext: config.framework.component_extension(config.typescript),
        }
    }
}

/// Package dependencies for the target.
pub fn template_descriptor(config: &GenerationConfig) -> TemplateDescriptor {
    let ts = config.typescript;
    let tests = config.testing.unit_tests;

    let (dependencies, mut dev_dependencies): (Vec<&str>, Vec<&str>) = match config.framework {
        Framework::React => {
            let mut dev = Vec::new();
            if ts {
                dev.extend(["typescript", "@types/react", "@types/react-dom"]);
            }
            if tests {
                dev.extend(["jest", "@testing-library/react"]);
                if ts {
                    dev.push("@types/jest");
                }
            }
            (vec!["react", "react-dom"], dev)
        }
        Framework::Vue => {
            let mut dev = Vec::new();
            if ts {
                dev.extend(["typescript", "vue-tsc"]);
            }
            if tests {
                dev.extend(["vitest", "@vue/test-utils"]);
            }
            (vec!["vue"], dev)
        }
        Framework::Angular => {
            let mut dev = vec!["typescript"];
            if tests {
                dev.extend(["jasmine-core", "karma"]);
            }
            (vec!["@angular/core", "@angular/common"], dev)
        }
        Framework::Svelte => {
            let mut dev = Vec::new();
            if ts {
                dev.extend(["typescript", "svelte-check"]);
            }
            if tests {
                dev.extend(["vitest", "@testing-library/svelte"]);
            }
            (vec!["svelte"], dev)
        }
    };

    match config.styling {
        Styling::Scss => dev_dependencies.push("sass"),
        Styling::Tailwind => dev_dependencies.push("tailwindcss"),
        Styling::Css => {}
    }

    TemplateDescriptor {
        dependencies: dependencies.into_iter().map(String::from).collect(),
        dev_dependencies: dev_dependencies.into_iter().map(String::from).collect(),
        side_effects: None,
    }
}

/// Body of the click handler, shared by every non-React target.
fn click_handler_body(interactive: bool, state_update: &str) -> Vec<String> {
    let mut lines = Vec::new();
    if interactive {
        lines.push(state_update.to_string());
    }
    lines.push("console.log('Button clicked');".to_string());
    lines
}
