//! Angular component target.

use serde::Serialize;

use super::{click_handler_body, AdapterContext};
use crate::error::Result;
use crate::templates::{indent, TemplateEngine};

const COMPONENT_TEMPLATE: &str = r#"import { Component, Input } from '@angular/core';

@Component({
  selector: 'app-{{kebab_case name}}',
  template: `
    <div [class]="'{{root_class}} ' + className"{{active_attr}}>
      <div class="component-content">
{{indent body 8}}
      </div>
    </div>
  `,
  styleUrls: ['{{style_path}}'],
})
export class {{name}}Component {
{{members}}
}
"#;

#[derive(Serialize)]
struct AngularData<'a> {
    #[serde(flatten)]
    ctx: &'a AdapterContext<'a>,
    active_attr: &'static str,
    members: String,
}

pub(super) fn component(engine: &TemplateEngine<'_>, ctx: &AdapterContext<'_>) -> Result<String> {
    let data = AngularData {
        ctx,
        active_attr: if ctx.interactive { " [attr.data-active]=\"isActive\"" } else { "" },
        members: indent(&members(ctx), 2),
    };
    engine.render_string(COMPONENT_TEMPLATE, &data)
}

fn members(ctx: &AdapterContext<'_>) -> String {
    let mut lines = vec!["@Input() className = '';".to_string()];

    if ctx.interactive {
        lines.push("isActive = false;".to_string());
    }

    if ctx.has_click {
        let ret = if ctx.typescript { ": void" } else { "" };
        lines.push(String::new());
        lines.push(format!("handleClick(){} {{", ret));
        for line in click_handler_body(ctx.interactive, "this.isActive = !this.isActive;") {
            lines.push(format!("  {}", line));
        }
        lines.push("}".to_string());
    }

    lines.join("\n")
}

pub(super) fn test_file(ctx: &AdapterContext<'_>) -> String {
    let class = format!("{}Component", ctx.name);
    let mut lines = Vec::new();

    lines.push(format!("import {{ {} }} from '../components/{}';", class, ctx.name));
    lines.push(String::new());
    lines.push(format!("describe('{}', () => {{", class));
    lines.push("  it('creates', () => {".to_string());
    lines.push(format!("    const component = new {}();", class));
    lines.push("    expect(component).toBeTruthy();".to_string());
    lines.push("    expect(component.className).toBe('');".to_string());
    lines.push("  });".to_string());
    lines.push("});".to_string());

    lines.join("\n")
}
