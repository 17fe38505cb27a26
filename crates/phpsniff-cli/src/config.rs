//! Configuration file support for phpsniff
//!
//! Loads `.phpsniff.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use phpsniff_fixer::{CollisionPolicy, EngineConfig};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".phpsniff.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sniffs: SniffsConfig,
    pub engine: EngineSection,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SniffsConfig {
    /// If set, only these sniffs will run
    pub enabled: Option<Vec<String>>,
    /// Sniffs to exclude (applied after enabled)
    pub disabled: Vec<String>,
    /// Codes that are fixed but never reported
    pub silent: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub max_rounds: Option<usize>,
    pub collision: Option<CollisionPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.phpsniff.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Compute the effective set of enabled sniffs
    pub fn effective_sniffs(&self, all_sniffs: &[&str], cli_sniffs: &[String]) -> HashSet<String> {
        // CLI sniffs override config completely
        if !cli_sniffs.is_empty() {
            return cli_sniffs.iter().cloned().collect();
        }

        let mut sniffs: HashSet<String> = match &self.sniffs.enabled {
            Some(enabled) => enabled.iter().cloned().collect(),
            None => all_sniffs.iter().map(|s| s.to_string()).collect(),
        };

        for disabled in &self.sniffs.disabled {
            sniffs.remove(disabled);
        }

        sniffs
    }

    /// Engine settings from the file, with `--max-rounds` taking precedence
    pub fn engine_config(&self, fix: bool, cli_max_rounds: Option<usize>) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            fix,
            max_rounds: cli_max_rounds
                .or(self.engine.max_rounds)
                .unwrap_or(defaults.max_rounds),
            collision: self.engine.collision.unwrap_or(defaults.collision),
            silent: self.sniffs.silent.iter().cloned().collect(),
        }
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                // Also try matching against just the file/dir name
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}
