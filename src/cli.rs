//! Command-line front end.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::document::{export_with, OutputTarget};
use crate::preset::{PresetPriority, PresetRegistry};
use crate::toolpath::{parse_listing, Node, Operation};

/// Command-line arguments of the post processor
#[derive(Debug, Parser)]
#[command(name = "gcode-post")]
#[command(about = "Post-process tool paths into controller G-code")]
#[command(version)]
pub struct Cli {
    /// Job file: a JSON node list (`.json`) or a plain command listing
    pub input: PathBuf,

    #[arg(short, long, default_value = "-", help = "Output file, '-' prints to stdout")]
    pub output: String,

    #[arg(long, help = "Additional directory containing preset TOML files")]
    pub preset_dir: Option<PathBuf>,

    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Post processor options, e.g. `-- --precision 4 --modal`
    #[arg(last = true)]
    pub options: Vec<String>,
}

/// Entry point of the `gcode-post` binary
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    let mut registry = PresetRegistry::with_builtins();
    registry.load_user_presets()?;
    if let Some(dir) = &cli.preset_dir {
        let count = registry.load_directory(dir, PresetPriority::Explicit)?;
        log::info!("Loaded {} presets from {}", count, dir.display());
    }

    let nodes = load_job(&cli.input)?;
    let target = OutputTarget::from(cli.output.as_str());
    let text = export_with(&nodes, &target, &cli.options.join(" "), &registry, None)?;

    if target == OutputTarget::ReturnOnly {
        print!("{}", text);
    }

    Ok(())
}

/// Read a job file into top-level nodes
///
/// JSON files hold a node list. Anything else is a command listing forming a
/// single operation named after the file stem.
pub fn load_job(path: &Path) -> Result<Vec<Node>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file: {}", path.display()))?;

    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse job JSON: {}", path.display()));
    }

    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Operation");
    Ok(vec![Node::from(Operation::new(label, parse_listing(&content)))])
}
