use std::path::PathBuf;

use clap::{Parser, Subcommand};
use weft_core::{Framework, Styling};

use crate::tracing::{LogLevel, TracingFormat};

#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(about = "Turn design documents into framework components")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub log_level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Generate component files from a design document")]
    Generate {
        #[arg(help = "Path to the design document (JSON)")]
        design: PathBuf,

        #[arg(long, short = 'c', help = "Path to a generation config (JSON)")]
        config: Option<PathBuf>,

        #[arg(long, short = 'o', help = "Output directory", default_value = "weft-out")]
        out: PathBuf,

        #[arg(long, help = "Target framework (overrides the config)")]
        framework: Option<Framework>,

        #[arg(long, help = "Styling approach: css, scss or tailwind")]
        styling: Option<String>,

        #[arg(long, help = "Component name (overrides the config)")]
        name: Option<String>,

        #[arg(long, help = "Emit JavaScript instead of TypeScript")]
        javascript: bool,

        #[arg(long, help = "Disable the result cache")]
        no_cache: bool,

        #[arg(long, help = "Deadline for background tasks in milliseconds")]
        timeout_ms: Option<u64>,
    },

    #[command(about = "Render the normalized scene of a design document as SVG")]
    Scene {
        #[arg(help = "Path to the design document (JSON)")]
        design: PathBuf,

        #[arg(long, short = 'o', help = "Write the SVG to a file instead of stdout")]
        out: Option<PathBuf>,
    },
}

/// Parse a styling name the way config files spell it.
pub fn parse_styling(name: &str) -> anyhow::Result<Styling> {
    serde_json::from_value(serde_json::Value::String(name.to_lowercase()))
        .map_err(|_| anyhow::anyhow!("unknown styling: {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "weft",
            "generate",
            "design.json",
            "--framework",
            "vue",
            "--no-cache",
            "--timeout-ms",
            "500",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                framework,
                no_cache,
                timeout_ms,
                ..
            } => {
                assert_eq!(framework, Some(Framework::Vue));
                assert!(no_cache);
                assert_eq!(timeout_ms, Some(500));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_styling() {
        assert_eq!(parse_styling("SASS").unwrap(), Styling::Scss);
        assert_eq!(parse_styling("utility").unwrap(), Styling::Tailwind);
        assert!(parse_styling("less").is_err());
    }
}
