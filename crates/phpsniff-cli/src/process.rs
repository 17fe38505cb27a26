//! File processing logic for phpsniff

use anyhow::{Context, Result};
use std::path::Path;

use phpsniff_core::TokenStream;
use phpsniff_fixer::{run_file, EngineConfig, FileReport, Ruleset};

/// Result of processing a single file
pub struct ProcessResult {
    pub report: FileReport,
    /// Source as read from disk
    pub old_source: String,
}

/// Run the ruleset over a single PHP file
pub fn process_file(path: &Path, ruleset: &Ruleset, config: &EngineConfig) -> Result<ProcessResult> {
    let old_source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let report = run_file(path, &old_source, ruleset, config);

    Ok(ProcessResult { report, old_source })
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Token stream of a file as pretty JSON
pub fn dump_tokens(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let stream = TokenStream::parse(&source);
    serde_json::to_string_pretty(stream.as_slice())
        .with_context(|| format!("Failed to serialize tokens of {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_process_file_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php $a = TRUE;\n").unwrap();

        let config = EngineConfig {
            fix: true,
            ..Default::default()
        };
        let result = process_file(&path, &Ruleset::standard(), &config).unwrap();

        assert_eq!(result.old_source, "<?php $a = TRUE;\n");
        assert_eq!(result.report.source, "<?php $a = true;\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php $a = TRUE;\n");

        write_file(&path, &result.report.source).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php $a = true;\n");
    }

    #[test]
    fn test_process_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.php");

        let result = process_file(&path, &Ruleset::standard(), &EngineConfig::default());
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("missing.php"));
    }

    #[test]
    fn test_process_keeps_crlf() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php\r\nIF ($a) {}   \r\n").unwrap();

        let config = EngineConfig {
            fix: true,
            ..Default::default()
        };
        let result = process_file(&path, &Ruleset::standard(), &config).unwrap();
        assert_eq!(result.report.source, "<?php\r\nif ($a) {}\r\n");
    }

    #[test]
    fn test_dump_tokens() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php class Foo {}").unwrap();

        let json = dump_tokens(&path).unwrap();
        assert!(json.contains("\"kind\": \"Class\""));
        assert!(json.contains("\"text\": \"Foo\""));
    }
}
