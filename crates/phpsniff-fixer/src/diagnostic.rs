//! Violations reported by sniffs

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
        }
    }
}

/// One reported violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Full code, `Standard.Category.Sniff.Code`
    pub code: String,
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// The sniff offered a fix for it
    pub fixable: bool,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Code used for a sniff that staged an edit outside the token stream
pub const INVALID_INDEX_CODE: &str = "Internal.Fixer.InvalidIndex";
