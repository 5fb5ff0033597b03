//! CLI tool to validate scene-generation phase outputs.
//!
//! Usage:
//!   scenecheck [--context ctx.json] [--outline outline.json] [--results results.json]
//!              [--expected-scenes N] [--limits limits.json] [--json] [-v]

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use scenecheck::{Limits, PipelineInput, Validator};

#[derive(Parser, Debug)]
#[command(
    name = "scenecheck",
    about = "Validate context, outline and rendered-scene JSON from a generation pipeline",
    version
)]
struct Args {
    /// Phase 1 context JSON file
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Phase 3 outline JSON file (array)
    #[arg(short, long)]
    outline: Option<PathBuf>,

    /// Phase 5 results JSON file (array of scenes)
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// Expected number of scenes in the outline
    #[arg(short, long, env = "SCENECHECK_EXPECTED_SCENES")]
    expected_scenes: Option<usize>,

    /// JSON file overriding validation limits
    #[arg(long, env = "SCENECHECK_LIMITS")]
    limits: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long, default_value = "false")]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<bool> {
    let limits = match &args.limits {
        Some(path) => Limits::from_file(path)
            .with_context(|| format!("Failed to load limits from {}", path.display()))?,
        None => Limits::default(),
    };

    // 1. Load whichever phases were given
    let mut input = PipelineInput::new();
    if let Some(path) = &args.context {
        input = input.with_context(read_json(path)?);
    }
    if let Some(path) = &args.outline {
        input = input.with_outline(read_json(path)?);
    }
    if let Some(path) = &args.results {
        input = input.with_results(read_json(path)?);
    }
    if input.context.is_none() && input.outline.is_none() && input.results.is_none() {
        anyhow::bail!("Nothing to validate: pass at least one of --context, --outline, --results");
    }

    // 2. Validate
    let report = Validator::with_limits(limits).validate_pipeline(&input, args.expected_scenes);

    // 3. Print
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", render::render_report(&report));
    }

    Ok(report.valid)
}

/// Exit status: 0 valid, 1 invalid, 2 I/O or parse failure.
fn exit_status(outcome: &Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = run(args);
    if let Err(err) = &outcome {
        eprintln!("Error: {:#}", err);
    }
    ExitCode::from(exit_status(&outcome))
}
