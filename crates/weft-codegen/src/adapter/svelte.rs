//! Svelte component target.

use serde::Serialize;

use super::{click_handler_body, AdapterContext};
use crate::error::Result;
use crate::templates::TemplateEngine;

const COMPONENT_TEMPLATE: &str = r#"<script{{#if typescript}} lang="ts"{{/if}}>
{{indent script 2}}
</script>

<div class="{{root_class}} {className}"{{active_attr}} {...$$restProps}>
  <div class="component-content">
{{indent body 4}}
  </div>
</div>
"#;

#[derive(Serialize)]
struct SvelteData<'a> {
    #[serde(flatten)]
    ctx: &'a AdapterContext<'a>,
    active_attr: &'static str,
    script: String,
}

pub(super) fn component(engine: &TemplateEngine<'_>, ctx: &AdapterContext<'_>) -> Result<String> {
    let data = SvelteData {
        ctx,
        active_attr: if ctx.interactive { " data-active={isActive}" } else { "" },
        script: script(ctx),
    };
    engine.render_string(COMPONENT_TEMPLATE, &data)
}

fn script(ctx: &AdapterContext<'_>) -> String {
    let mut lines = Vec::new();

    lines.push(format!("import '{}';", ctx.style_path));
    lines.push(String::new());
    if ctx.typescript {
        lines.push("export let className: string = '';".to_string());
    } else {
        lines.push("export let className = '';".to_string());
    }

    if ctx.interactive {
        lines.push("let isActive = false;".to_string());
    }

    if ctx.has_click {
        lines.push(String::new());
        lines.push("function handleClick() {".to_string());
        for line in click_handler_body(ctx.interactive, "isActive = !isActive;") {
            lines.push(format!("  {}", line));
        }
        lines.push("}".to_string());
    }

    lines.join("\n")
}

pub(super) fn test_file(ctx: &AdapterContext<'_>) -> String {
    let name = ctx.name;
    let mut lines = Vec::new();

    lines.push("import { describe, it, expect } from 'vitest';".to_string());
    lines.push("import { render } from '@testing-library/svelte';".to_string());
    lines.push(format!("import {} from '../components/{}.svelte';", name, name));
    lines.push(String::new());
    lines.push(format!("describe('{}', () => {{", name));
    lines.push("  it('renders', () => {".to_string());
    lines.push(format!("    const {{ container }} = render({});", name));
    lines.push("    expect(container.firstChild).toBeTruthy();".to_string());
    lines.push("  });".to_string());
    lines.push("});".to_string());

    lines.join("\n")
}
