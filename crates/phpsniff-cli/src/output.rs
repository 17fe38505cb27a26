//! Output formatting for phpsniff
//!
//! Supports text (colored terminal), JSON and unified diff output formats.

use colored::*;
use phpsniff_fixer::{Diagnostic, FileReport, Outcome, Severity};
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Changesets applied, or that would be applied in check mode
    pub fixed: usize,
    /// Set when the round cap stopped fixing before the file settled
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub round_cap_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, report: &FileReport) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: report.diagnostics.clone(),
            fixed: report.fixed,
            round_cap_reached: report.outcome == Outcome::RoundCapReached,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            fixed: 0,
            round_cap_reached: false,
            error: Some(error),
        }
    }

    #[allow(dead_code)]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_fixed: usize,
    pub total_fixed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub fixable: usize,
    pub failures: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the engine's result for one file
    ///
    /// `old_source` is the text read from disk; the report's `source` is the
    /// fixed text, which is only written when `fix_mode` is set.
    pub fn report(&mut self, path: &Path, report: &FileReport, old_source: &str, fix_mode: bool) {
        self.summary.files_processed += 1;
        self.summary.errors += report.error_count();
        self.summary.warnings += report.warning_count();
        self.summary.fixable += report.diagnostics.iter().filter(|d| d.fixable).count();
        if fix_mode && report.is_changed() {
            self.summary.files_fixed += 1;
            self.summary.total_fixed += report.fixed;
        }

        match self.format {
            OutputFormat::Text => self.print_text(path, report, old_source, fix_mode),
            OutputFormat::Diff => {
                if report.source != old_source {
                    print_unified_diff(path, old_source, &report.source);
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::success(path, report));
    }

    fn print_text(&self, path: &Path, report: &FileReport, old_source: &str, fix_mode: bool) {
        let changed = fix_mode && report.is_changed();
        if report.diagnostics.is_empty() && !changed {
            if self.verbose {
                println!("{}: No violations", path.display());
            }
            return;
        }

        println!("{}", path.display().to_string().bold());
        if changed {
            println!("  {} Fixed {} violation(s)", "OK".green(), report.fixed);
            if self.verbose {
                print_diff(old_source, &report.source);
            }
        }
        if report.outcome == Outcome::RoundCapReached {
            println!(
                "  {} Stopped after {} round(s) without settling",
                "!".yellow(),
                report.rounds
            );
        }
        for diagnostic in &report.diagnostics {
            print_diagnostic(diagnostic);
        }
        println!();
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.failures += 1;

        if self.format == OutputFormat::Text {
            eprintln!(
                "{}: {} - {}",
                "Warning".yellow(),
                path.display(),
                error
            );
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, fix_mode: bool) {
        match self.format {
            OutputFormat::Text => {
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                if fix_mode {
                    println!("  Files fixed: {}", self.summary.files_fixed);
                    println!("  Violations fixed: {}", self.summary.total_fixed);
                }
                println!("  Errors: {}", self.summary.errors);
                println!("  Warnings: {}", self.summary.warnings);
                if self.summary.failures > 0 {
                    println!("  Unreadable files: {}", self.summary.failures);
                }

                if !fix_mode && self.summary.fixable > 0 {
                    println!();
                    println!(
                        "{}",
                        format!(
                            "Run with --fix to fix {} violation(s) automatically",
                            self.summary.fixable
                        )
                        .yellow()
                    );
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                match serde_json::to_string_pretty(&output) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("{}: {}", "Error".red(), e),
                }
            }
            OutputFormat::Diff => {
                // Patch-compatible output carries no summary
            }
        }
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn print_diagnostic(diagnostic: &Diagnostic) {
    let severity = match diagnostic.severity {
        Severity::Error => diagnostic.severity.to_string().red().bold(),
        Severity::Warning => diagnostic.severity.to_string().yellow().bold(),
    };
    let marker = if diagnostic.fixable { "[x]" } else { "[ ]" };
    println!(
        "  {:>4}:{:<3} {} {} {} {}",
        diagnostic.line,
        diagnostic.column,
        severity,
        marker,
        diagnostic.message,
        format!("({})", diagnostic.code).dimmed()
    );
}

/// Print a colored diff between old and new content
fn print_diff(old: &str, new: &str) {
    for diff_result in diff::lines(old, new) {
        match diff_result {
            diff::Result::Left(l) => {
                println!("  {}", format!("- {}", l).red());
            }
            diff::Result::Right(r) => {
                println!("  {}", format!("+ {}", r).green());
            }
            diff::Result::Both(_, _) => {}
        }
    }
}

/// Print unified diff format (standard diff -u compatible)
fn print_unified_diff(path: &Path, old: &str, new: &str) {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();

    println!("--- a/{}", path_str);
    println!("+++ b/{}", path_str);

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        println!("{}", hunk.header());
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            print!("{}{}", sign, change);
            if change.missing_newline() {
                println!();
            }
        }
    }
}
