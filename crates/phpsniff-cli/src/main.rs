//! phpsniff CLI - PHP coding standard checker and fixer
//!
//! Bundled sniffs:
//! - Generic.PHP.LowerCaseKeyword: PHP keywords must be lowercase
//! - Generic.PHP.LowerCaseConstant: true, false and null must be lowercase
//! - Generic.WhiteSpace.TrailingWhitespace: no whitespace at the end of a line
//! - Generic.Arrays.DisallowLongArraySyntax: array() becomes []
//! - Squiz.Classes.SelfMemberReference: Foo:: inside class Foo becomes self::
//! - Generic.Commenting.DocCommentAliasTag: @type becomes @var, @link becomes @see
//! - Generic.Formatting.EmptyBody: empty class and function bodies become {}

mod config;
mod output;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use output::{OutputFormat, Reporter};
use process::{dump_tokens, process_file, write_file, ProcessResult};
use phpsniff_fixer::{logging, Ruleset};

#[derive(Parser)]
#[command(name = "phpsniff")]
#[command(version = "0.1.0")]
#[command(about = "Token-based PHP coding standard checker and fixer")]
#[command(author = "phpsniff contributors")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_sniffs")]
    paths: Vec<PathBuf>,

    /// Apply fixes to files
    #[arg(long)]
    fix: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Sniffs to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 's', value_name = "CODE")]
    sniff: Vec<String>,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Fixing rounds per file before giving up
    #[arg(long, value_name = "N")]
    max_rounds: Option<usize>,

    /// Path to config file (default: auto-detect .phpsniff.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// List available sniffs and exit
    #[arg(long)]
    list_sniffs: bool,

    /// Print the token stream of each file as JSON instead of checking it
    #[arg(long, conflicts_with = "fix")]
    tokens: bool,

    /// Write a debug log (default: /tmp/phpsniff-<timestamp>.log)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    debug_log: Option<Option<PathBuf>>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let standard = Ruleset::standard();

    if cli.list_sniffs {
        println!("{}", "Available sniffs:".bold());
        for info in standard.list() {
            println!("  {} - {}", info.code.green(), info.description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(log_path) = &cli.debug_log {
        let path = logging::init_logger(log_path.as_deref())?;
        eprintln!("{}: {}", "Debug log".bold(), path.display());
    }

    // Load config file
    let (config, config_path) = if cli.no_config {
        (Config::default(), None)
    } else if let Some(config_path) = &cli.config {
        (Config::load_path(config_path)?, Some(config_path.clone()))
    } else {
        match Config::load()? {
            Some((cfg, path)) => (cfg, Some(path)),
            None => (Config::default(), None),
        }
    };

    let format_name = cli
        .format
        .clone()
        .or_else(|| config.output.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let output_format = OutputFormat::from_str(&format_name).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json, diff",
            format_name
        )
    })?;
    let verbose = cli.verbose && output_format == OutputFormat::Text;

    if verbose {
        if let Some(path) = &config_path {
            println!("{}: {}", "Using config".bold(), path.display());
        }
    }

    let enabled = config.effective_sniffs(&standard.codes(), &cli.sniff);
    let ruleset = standard.restrict(&enabled).map_err(|e| {
        anyhow::anyhow!("{}. Use --list-sniffs to see available sniffs.", e)
    })?;
    if ruleset.is_empty() {
        eprintln!("{}: No sniffs enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    // Diff output needs the fixed text even when nothing is written
    let fix_mode = cli.fix;
    let engine = config.engine_config(fix_mode || output_format == OutputFormat::Diff, cli.max_rounds);
    engine.validate()?;

    if verbose {
        println!(
            "{}: {}",
            "Mode".bold(),
            if fix_mode { "fix" } else { "check" }
        );
        println!("{}: {}", "Sniffs".bold(), ruleset.codes().join(", "));
        println!();
    }

    // Collect all file paths first
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in &cli.paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if !config.should_exclude(file_path) {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }
    file_paths.sort();

    for path in &missing_paths {
        eprintln!(
            "{}: Path does not exist: {}",
            "Warning".yellow(),
            path.display()
        );
    }

    if cli.tokens {
        for path in &file_paths {
            println!("{}", dump_tokens(path)?);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Process files in parallel; collect preserves the sorted order
    let results: Vec<Result<ProcessResult>> = file_paths
        .par_iter()
        .map(|path| process_file(path, &ruleset, &engine))
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for (path, result) in file_paths.iter().zip(results) {
        match result {
            Ok(result) => {
                if fix_mode && result.report.is_changed() {
                    write_file(path, &result.report.source)?;
                }
                reporter.report(path, &result.report, &result.old_source, fix_mode);
            }
            Err(e) => reporter.report_error(path, &format!("{:#}", e)),
        }
    }

    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 || summary.failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(fix_mode);
    logging::shutdown();

    Ok(exit_code)
}
