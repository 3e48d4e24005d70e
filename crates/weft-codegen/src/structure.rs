//! Project structure planning.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use weft_core::{DesignPattern, GenerationConfig, ProjectStructure};
use weft_extract::NormalizedScene;

/// Source root of every planned path.
pub const SOURCE_ROOT: &str = "src";

/// Plan the project layout for a generation.
///
/// One component path per detected pattern, numbered within its kind;
/// without patterns the configured component is the only one.
pub fn plan_structure(
    scene: &NormalizedScene,
    patterns: &[DesignPattern],
    config: &GenerationConfig,
) -> ProjectStructure {
    let ext = config.framework.component_extension(config.typescript);
    let script = config.script_extension();
    let style = config.styling.extension();

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut components: Vec<String> = patterns
        .iter()
        .map(|p| {
            let kind = format!("{:?}", p.kind).to_case(Case::Pascal);
            let n = counts.entry(kind.clone()).or_insert(0);
            *n += 1;
            format!("components/{}{}.{}", kind, n, ext)
        })
        .collect();
    if components.is_empty() {
        components.push(format!("components/{}.{}", config.component_name, ext));
    }

    let hooks = if patterns.iter().any(|p| p.kind.is_interactive()) {
        vec![format!("hooks/useInteraction.{}", script)]
    } else {
        Vec::new()
    };

    let types = if config.typescript {
        vec!["types/index.ts".to_string(), "types/components.ts".to_string()]
    } else {
        Vec::new()
    };

    let tests = if config.testing.unit_tests {
        vec!["__tests__/".to_string()]
    } else {
        Vec::new()
    };

    let mut assets: Vec<String> = Vec::new();
    for image in scene.shapes.iter().filter_map(|s| s.image_ref.as_deref()) {
        let path = format!("assets/{}", image);
        if !assets.contains(&path) {
            assets.push(path);
        }
    }

    ProjectStructure {
        root: SOURCE_ROOT.to_string(),
        components,
        hooks,
        utils: vec![
            format!("utils/helpers.{}", script),
            format!("utils/constants.{}", script),
        ],
        types,
        styles: vec![
            format!("styles/main.{}", style),
            format!("styles/components.{}", style),
        ],
        tests,
        assets,
    }
}
