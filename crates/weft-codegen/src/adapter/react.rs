//! React target.
//!
//! The rendered markup is already React; only the stylesheet import is
//! added below the framework import.

use weft_core::ComponentIr;

use super::AdapterContext;

pub(super) fn component(ir: &ComponentIr, ctx: &AdapterContext<'_>) -> String {
    let mut lines: Vec<String> = ir.markup.lines().map(String::from).collect();
    let at = lines
        .iter()
        .position(|l| l.starts_with("import React"))
        .map_or(0, |i| i + 1);
    lines.insert(at, format!("import '{}';", ctx.style_path));
    lines.join("\n")
}

pub(super) fn test_file(ctx: &AdapterContext<'_>) -> String {
    let name = ctx.name;
    let mut lines = Vec::new();

    lines.push("import React from 'react';".to_string());
    lines.push("import { render } from '@testing-library/react';".to_string());
    lines.push(format!("import {} from '../components/{}';", name, name));
    lines.push(String::new());
    lines.push(format!("describe('{}', () => {{", name));
    lines.push("  it('renders without crashing', () => {".to_string());
    lines.push(format!("    const {{ container }} = render(<{} />);", name));
    lines.push("    expect(container.firstChild).toBeTruthy();".to_string());
    lines.push("  });".to_string());
    lines.push(String::new());
    lines.push("  it('forwards the className prop', () => {".to_string());
    lines.push(format!(
        "    const {{ container }} = render(<{} className=\"extra\" />);",
        name
    ));
    lines.push("    expect(container.innerHTML).toContain('extra');".to_string());
    lines.push("  });".to_string());
    lines.push("});".to_string());

    lines.join("\n")
}
