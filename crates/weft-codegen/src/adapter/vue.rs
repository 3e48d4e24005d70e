//! Vue single-file component target.

use serde::Serialize;

use super::{click_handler_body, AdapterContext};
use crate::error::Result;
use crate::templates::TemplateEngine;

const COMPONENT_TEMPLATE: &str = r#"<template>
  <div :class="['{{root_class}}', className]"{{active_attr}} v-bind="$attrs">
    <div class="component-content">
{{indent body 6}}
    </div>
  </div>
</template>

<script setup{{#if typescript}} lang="ts"{{/if}}>
{{script}}
</script>

<style scoped{{#if scss}} lang="scss"{{/if}} src="{{style_path}}"></style>
"#;

#[derive(Serialize)]
struct VueData<'a> {
    #[serde(flatten)]
    ctx: &'a AdapterContext<'a>,
    active_attr: &'static str,
    script: String,
}

pub(super) fn component(engine: &TemplateEngine<'_>, ctx: &AdapterContext<'_>) -> Result<String> {
    let data = VueData {
        ctx,
        active_attr: if ctx.interactive { " :data-active=\"isActive\"" } else { "" },
        script: script(ctx),
    };
    engine.render_string(COMPONENT_TEMPLATE, &data)
}

fn script(ctx: &AdapterContext<'_>) -> String {
    let mut lines = Vec::new();

    if ctx.interactive {
        lines.push("import { ref } from 'vue';".to_string());
        lines.push(String::new());
    }

    if ctx.typescript {
        lines.push("withDefaults(defineProps<{ className?: string }>(), { className: '' });".to_string());
    } else {
        lines.push("defineProps({ className: { type: String, default: '' } });".to_string());
    }

    if ctx.interactive {
        lines.push(String::new());
        lines.push("const isActive = ref(false);".to_string());
    }

    if ctx.has_click {
        lines.push(String::new());
        lines.push("function handleClick() {".to_string());
        for line in click_handler_body(ctx.interactive, "isActive.value = !isActive.value;") {
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
    lines.push("import { mount } from '@vue/test-utils';".to_string());
    lines.push(format!("import {} from '../components/{}.vue';", name, name));
    lines.push(String::new());
    lines.push(format!("describe('{}', () => {{", name));
    lines.push("  it('mounts', () => {".to_string());
    lines.push(format!("    const wrapper = mount({});", name));
    lines.push("    expect(wrapper.exists()).toBe(true);".to_string());
    lines.push("  });".to_string());
    lines.push("});".to_string());

    lines.join("\n")
}
