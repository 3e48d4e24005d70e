//! Declared companion files.

use serde::Serialize;
use weft_core::{Framework, TemplateDescriptor};

use super::AdapterContext;
use crate::error::Result;
use crate::templates::TemplateEngine;

const README_TEMPLATE: &str = r#"# {{name}}

Generated {{framework}} component.

## Usage

```{{component_ext}}
{{usage}}
```

## Dependencies

{{#each dependencies}}
- `{{this}}`
{{/each}}
{{#if dev_dependencies}}

## Development dependencies

{{#each dev_dependencies}}
- `{{this}}`
{{/each}}
{{/if}}
"#;

#[derive(Serialize)]
struct ReadmeData<'a> {
    name: &'a str,
    framework: &'static str,
    component_ext: &'static str,
    usage: String,
    dependencies: &'a [String],
    dev_dependencies: &'a [String],
}

/// Props declaration shared by typed targets.
pub(super) fn types_file(ctx: &AdapterContext<'_>) -> String {
    let mut lines = Vec::new();
    lines.push(format!("export interface {}Props {{", ctx.name));
    lines.push("  className?: string;".to_string());
    lines.push("  [key: string]: unknown;".to_string());
    lines.push("}".to_string());
    lines.join("\n")
}

pub(super) fn readme(
    engine: &TemplateEngine<'_>,
    ctx: &AdapterContext<'_>,
    framework: Framework,
    template: &TemplateDescriptor,
) -> Result<String> {
    let name = ctx.name;
    let usage = match framework {
        Framework::React => format!(
            "import {name} from './components/{name}';\n\n<{name} className=\"custom\" />"
        ),
        Framework::Vue => format!(
            "import {name} from './components/{name}.vue';\n\n<{name} class-name=\"custom\" />"
        ),
        Framework::Angular => format!(
            "import {{ {name}Component }} from './components/{name}';\n\n<app-{} className=\"custom\"></app-{}>",
            ctx.root_class, ctx.root_class
        ),
        Framework::Svelte => format!(
            "import {name} from './components/{name}.svelte';\n\n<{name} className=\"custom\" />"
        ),
    };

    let data = ReadmeData {
        name,
        framework: framework.name(),
        component_ext: ctx.component_ext,
        usage,
        dependencies: &template.dependencies,
        dev_dependencies: &template.dev_dependencies,
    };
    engine.render_string(README_TEMPLATE, &data)
}
