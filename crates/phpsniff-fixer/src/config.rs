//! Engine settings shared by every file of a run

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::fixer::CollisionPolicy;

/// Default number of fixing rounds before the engine gives up
pub const DEFAULT_MAX_ROUNDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_rounds must be at least 1, got {0}")]
    InvalidMaxRounds(usize),
    #[error("unknown sniff '{0}'")]
    UnknownSniff(String),
}

/// How the engine runs a file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Apply fixes instead of only reporting
    pub fix: bool,
    /// Fixing rounds before a final report-only pass
    pub max_rounds: usize,
    pub collision: CollisionPolicy,
    /// Codes whose fixes apply but which are never reported. An entry
    /// matches a full code or any code it is a dotted prefix of.
    pub silent: HashSet<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fix: false,
            max_rounds: DEFAULT_MAX_ROUNDS,
            collision: CollisionPolicy::default(),
            silent: HashSet::new(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rounds == 0 {
            return Err(ConfigError::InvalidMaxRounds(self.max_rounds));
        }
        Ok(())
    }

    /// Whether diagnostics with `code` are suppressed
    pub fn is_silent(&self, code: &str) -> bool {
        self.silent.iter().any(|entry| {
            code == entry
                || (code.starts_with(entry.as_str()) && code.as_bytes().get(entry.len()) == Some(&b'.'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.fix);
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.collision, CollisionPolicy::FirstWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = EngineConfig {
            max_rounds: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxRounds(0)));
    }

    #[test]
    fn test_silent_matching() {
        let config = EngineConfig {
            silent: ["Generic.PHP.LowerCaseKeyword".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(config.is_silent("Generic.PHP.LowerCaseKeyword"));
        assert!(config.is_silent("Generic.PHP.LowerCaseKeyword.Found"));
        assert!(!config.is_silent("Generic.PHP.LowerCaseKeywordX.Found"));
        assert!(!config.is_silent("Generic.PHP.LowerCaseConstant.Found"));
    }
}
