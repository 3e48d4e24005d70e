mod cli;
mod tracing;

use std::fs;
use std::path::{Component, Path};
use std::time::Duration;

use ::tracing::{debug, info, warn};
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use weft_core::{DesignDocument, GeneratedArtifact, GenerationConfig};
use weft_extract::DesignExtractor;
use weft_pipeline::{Orchestrator, OrchestratorOptions};

use crate::cli::{parse_styling, Cli, Commands};
use crate::tracing::{init_tracing, TracingConfig};

const ARTIFACT_FILE: &str = "artifact.json";
const PREVIEW_FILE: &str = "preview.html";

#[tokio::main]
async fn main() {
    if let Err(e) = run_main().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run_main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.log_level.into(),
    })?;

    match cli.command {
        Commands::Generate {
            design,
            config,
            out,
            framework,
            styling,
            name,
            javascript,
            no_cache,
            timeout_ms,
        } => {
            let mut generation = match config {
                Some(path) => GenerationConfig::from_path(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => GenerationConfig::default(),
            };
            if let Some(framework) = framework {
                generation.framework = framework;
            }
            if let Some(styling) = styling {
                generation.styling = parse_styling(&styling)?;
            }
            if let Some(name) = name {
                generation.component_name = name;
            }
            if javascript {
                generation.typescript = false;
            }

            let mut options = OrchestratorOptions {
                cache_enabled: !no_cache,
                ..Default::default()
            };
            if let Some(ms) = timeout_ms {
                options.dispatch_timeout = Duration::from_millis(ms);
                options.collaborator_timeout = Some(Duration::from_millis(ms));
            }

            let document = DesignDocument::from_value(read_json(&design)?)?;
            let orchestrator = Orchestrator::new(options)?;
            let progress = |percent: u8, status: &str| debug!(percent, "{status}");
            let result = orchestrator
                .generate_with_progress(&document, &generation, &progress)
                .await;
            orchestrator.shutdown();
            let artifact = result?;

            write_artifact(&out, &artifact)?;
            println!(
                "{} {} files to {} (status: {}, quality: {:.1})",
                artifact.id,
                artifact.files.len(),
                out.display(),
                artifact.build_status,
                artifact.quality.overall()
            );
        }
        Commands::Scene { design, out } => {
            let document = DesignDocument::from_value(read_json(&design)?)?;
            let (scene, tokens) = DesignExtractor::new().extract(&document);
            debug!(
                shapes = scene.len(),
                colors = tokens.colors.len(),
                fonts = tokens.fonts.len(),
                placeholder = scene.placeholder,
                "scene extracted"
            );
            let svg = scene.to_svg();
            match out {
                Some(path) => {
                    fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?
                }
                None => print!("{svg}"),
            }
        }
    }
    Ok(())
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn write_artifact(out: &Path, artifact: &GeneratedArtifact) -> Result<()> {
    for file in &artifact.files {
        let relative = Path::new(&file.path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            bail!("refusing to write outside the output directory: {}", file.path);
        }
        let target = out.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&target, &file.content)
            .with_context(|| format!("writing {}", target.display()))?;
        debug!(path = %target.display(), bytes = file.size, "file written");
    }

    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    fs::write(out.join(PREVIEW_FILE), &artifact.preview)?;
    fs::write(
        out.join(ARTIFACT_FILE),
        serde_json::to_string_pretty(artifact)?,
    )?;

    for log in &artifact.build_logs {
        match log.level {
            weft_core::LogLevel::Error | weft_core::LogLevel::Warn => {
                warn!(file = ?log.file, "{}", log.message)
            }
            _ => info!(file = ?log.file, "{}", log.message),
        }
    }
    Ok(())
}
