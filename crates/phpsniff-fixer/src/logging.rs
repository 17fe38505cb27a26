//! Debug logging for phpsniff runs
//!
//! Records round starts, commits, rejected changesets and contract
//! violations to a file for debugging. Logging is off until
//! [`init_logger`] is called; every call is a no-op while it is off.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<DebugLogger>> = Mutex::new(None);

/// File-backed logger
pub struct DebugLogger {
    file: File,
    path: PathBuf,
}

impl DebugLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger, defaulting to a timestamped file in /tmp
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/phpsniff-{}.log", timestamp))
    });

    let logger = DebugLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Stop logging and close the file
pub fn shutdown() {
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = None;
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the start of a file
pub fn log_file_start(path: &Path, tokens: usize, fixing: bool) {
    section(&format!("FILE {}", path.display()));
    log(&format!(
        "{} tokens, mode: {}",
        tokens,
        if fixing { "fix" } else { "report" }
    ));
}

/// Log the start of a round
pub fn log_round_start(path: &Path, round: usize, fixing: bool) {
    log(&format!(
        "{}: round {}{}",
        path.display(),
        round,
        if fixing { "" } else { " (report only)" }
    ));
}

/// Log the result of a round
pub fn log_round_end(path: &Path, round: usize, commits: usize, rejected: usize) {
    log(&format!(
        "{}: round {} committed {} changeset(s), rejected {}",
        path.display(),
        round,
        commits,
        rejected
    ));
}

/// Log a sniff that broke the fixer contract
pub fn log_contract_violation(path: &Path, sniff: &str, ptr: usize, error: &str) {
    log(&format!(
        "CONTRACT VIOLATION in {} at token {} of {}: {}",
        sniff,
        ptr,
        path.display(),
        error
    ));
}

/// Log how a file's run ended
pub fn log_outcome(path: &Path, outcome: &str, rounds: usize, fixed: usize, remaining: usize) {
    log(&format!(
        "{}: {} after {} round(s), {} fix(es) applied, {} diagnostic(s) remaining",
        path.display(),
        outcome,
        rounds,
        fixed,
        remaining
    ));
}
