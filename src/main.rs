//! faultline CLI entry point.
//!
//! Reads diagnostic output from a file, stdin, or a child command, groups it
//! into error patterns and prints a summary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use faultline::config::resolve_config;
use faultline::render::{render, Format, RenderOptions};
use faultline::{analyze, AnalysisOptions, Selection};

/// Exit status when `--fail-on-errors` is set and errors were found.
const EXIT_ERRORS_FOUND: u8 = 1;
/// Exit status for operational failures.
const EXIT_FAILURE: u8 = 2;

/// Group compiler, linter and test failures into patterns.
#[derive(Parser)]
#[command(name = "faultline", version, about)]
struct Cli {
    /// Input file. Reads stdin when omitted or `-`.
    file: Option<PathBuf>,

    /// Input format: auto, typescript, eslint, jest, python, rust, go, gcc, generic.
    #[arg(short = 't', long = "type", value_name = "CATEGORY")]
    category: Option<Selection>,

    /// Number of patterns to show (0 shows all).
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Merge patterns with similar signatures.
    #[arg(long)]
    fuzzy: bool,

    /// Similarity threshold for --fuzzy (0.0 - 1.0). Implies --fuzzy.
    #[arg(long, value_name = "THRESHOLD")]
    threshold: Option<f64>,

    /// Output format: text, json, markdown.
    #[arg(short = 'f', long)]
    format: Option<Format>,

    /// Files listed per pattern.
    #[arg(long)]
    max_files: Option<usize>,

    /// Config file (default: platform config dir, or $FAULTLINE_CONFIG).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Exit with status 1 when any error is found.
    #[arg(long)]
    fail_on_errors: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    /// Command to run; its stdout and stderr are analyzed.
    #[arg(last = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    faultline::logging::init_cli(cli.verbose, cli.log_json);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("faultline: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Load config, read input, analyze and print.
fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = resolve_config(cli.config.as_deref())?;

    // CLI flags win over env and file.
    if let Some(top) = cli.top {
        config.grouping.top = top;
    }
    if cli.fuzzy {
        config.grouping.fuzzy = true;
    }
    if let Some(threshold) = cli.threshold {
        anyhow::ensure!(
            (0.0..=1.0).contains(&threshold),
            "--threshold must be in [0.0, 1.0]"
        );
        config.grouping.threshold = threshold;
        config.grouping.fuzzy = true;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(max_files) = cli.max_files {
        config.output.max_files = max_files;
    }
    let selection = match cli.category {
        Some(selection) => selection,
        None => config.selection()?,
    };

    let input = read_input(cli)?;
    debug!(bytes = input.len(), "input loaded");

    let options = AnalysisOptions {
        selection,
        top: config.grouping.top,
        fuzzy: config.grouping.fuzzy.then_some(config.grouping.threshold),
    };
    let analysis = analyze(&input, &options);

    let output = render(
        &analysis,
        &RenderOptions {
            format: config.output.format,
            max_files: config.output.max_files.max(1),
        },
    )
    .context("failed to render output")?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }

    if cli.fail_on_errors && analysis.stats.total_errors > 0 {
        return Ok(ExitCode::from(EXIT_ERRORS_FOUND));
    }
    Ok(ExitCode::SUCCESS)
}

/// Read the text to analyze from the command, the file, or stdin.
fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some((program, args)) = cli.command.split_first() {
        anyhow::ensure!(
            cli.file.is_none(),
            "pass either an input file or a command, not both"
        );
        return run_command(program, args);
    }

    match cli.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Run `program` and return its stdout followed by its stderr.
fn run_command(program: &str, args: &[String]) -> anyhow::Result<String> {
    let output = std::process::Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {program}"))?;

    info!(
        program,
        status = %output.status,
        "command finished"
    );

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}
