//! Sniff registry and dispatch table
//!
//! The ruleset collects sniffs, looks them up by code and maps every token
//! kind to the sniffs registered for it, so a round only visits sniffs that
//! asked for the current token.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use phpsniff_core::TokenKind;

use crate::config::ConfigError;
use crate::sniff::Sniff;
use crate::sniffs::{
    DisallowLongArraySyntaxSniff, DocCommentAliasTagSniff, EmptyBodySniff, LowerCaseConstantSniff,
    LowerCaseKeywordSniff, SelfMemberReferenceSniff, TrailingWhitespaceSniff,
};

/// Information about a registered sniff
#[derive(Debug, Clone)]
pub struct SniffInfo {
    pub code: &'static str,
    pub description: &'static str,
}

/// Registry of active sniffs
#[derive(Clone, Default)]
pub struct Ruleset {
    sniffs: Vec<Arc<dyn Sniff>>,
    by_code: HashMap<&'static str, usize>,
    dispatch: HashMap<TokenKind, Vec<usize>>,
}

impl Ruleset {
    /// Create an empty ruleset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ruleset with every bundled sniff
    pub fn standard() -> Self {
        let mut ruleset = Self::new();

        ruleset.register(Arc::new(LowerCaseKeywordSniff));
        ruleset.register(Arc::new(LowerCaseConstantSniff));
        ruleset.register(Arc::new(TrailingWhitespaceSniff));
        ruleset.register(Arc::new(DisallowLongArraySyntaxSniff));
        ruleset.register(Arc::new(SelfMemberReferenceSniff));
        ruleset.register(Arc::new(DocCommentAliasTagSniff));
        ruleset.register(Arc::new(EmptyBodySniff));

        ruleset
    }

    /// Register a sniff; a sniff with the same code replaces the earlier one
    pub fn register(&mut self, sniff: Arc<dyn Sniff>) {
        if let Some(&idx) = self.by_code.get(sniff.code()) {
            self.sniffs[idx] = sniff;
        } else {
            self.by_code.insert(sniff.code(), self.sniffs.len());
            self.sniffs.push(sniff);
        }
        self.rebuild_dispatch();
    }

    /// Get a sniff by its code
    pub fn get(&self, code: &str) -> Option<&Arc<dyn Sniff>> {
        self.by_code.get(code).map(|&idx| &self.sniffs[idx])
    }

    /// All sniffs in registration order
    pub fn all(&self) -> &[Arc<dyn Sniff>] {
        &self.sniffs
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.code()).collect()
    }

    /// Get information about all sniffs
    pub fn list(&self) -> Vec<SniffInfo> {
        self.sniffs
            .iter()
            .map(|s| SniffInfo {
                code: s.code(),
                description: s.description(),
            })
            .collect()
    }

    /// Sniffs registered for `kind`, in registration order
    pub fn for_kind(&self, kind: TokenKind) -> impl Iterator<Item = &Arc<dyn Sniff>> + '_ {
        self.dispatch
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&idx| &self.sniffs[idx])
    }

    /// A ruleset holding only the sniffs named in `codes`
    pub fn restrict(&self, codes: &HashSet<String>) -> Result<Ruleset, ConfigError> {
        if let Some(unknown) = codes.iter().find(|code| !self.by_code.contains_key(code.as_str())) {
            return Err(ConfigError::UnknownSniff(unknown.clone()));
        }

        let mut ruleset = Ruleset::new();
        for sniff in &self.sniffs {
            if codes.contains(sniff.code()) {
                ruleset.register(Arc::clone(sniff));
            }
        }
        Ok(ruleset)
    }

    /// Number of registered sniffs
    pub fn len(&self) -> usize {
        self.sniffs.len()
    }

    /// Check if the ruleset is empty
    pub fn is_empty(&self) -> bool {
        self.sniffs.is_empty()
    }

    fn rebuild_dispatch(&mut self) {
        self.dispatch.clear();
        for (idx, sniff) in self.sniffs.iter().enumerate() {
            let mut kinds = sniff.register();
            kinds.sort_unstable();
            kinds.dedup();
            for kind in kinds {
                self.dispatch.entry(kind).or_default().push(idx);
            }
        }
    }
}
