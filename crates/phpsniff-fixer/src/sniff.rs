//! The contract between the engine and individual checks

use phpsniff_core::TokenKind;

use crate::file::SniffFile;
use crate::fixer::FixerError;

/// A single lint and fix check
///
/// Sniffs hold no mutable state. Anything a sniff wants to remember about a
/// file goes through [`SniffFile::memo`].
pub trait Sniff: Send + Sync {
    /// Dotted code, `Standard.Category.Name`
    fn code(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Token kinds that trigger [`process`](Self::process)
    fn register(&self) -> Vec<TokenKind>;

    /// Check the token at `ptr`
    ///
    /// Called once per matching token per round. An error aborts the
    /// sniff's open changeset and is reported as an internal diagnostic.
    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError>;
}
