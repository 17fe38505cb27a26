//! Transactional token rewriting for one round
//!
//! The fixer holds a content string per token. Rules stage operations in a
//! changeset; ending the changeset either commits every operation or none.
//! Token indices never move during a round because operations rewrite the
//! content of existing tokens instead of inserting or removing tokens.

use std::collections::{BTreeMap, HashMap};

use phpsniff_core::TokenStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging;

/// Errors raised by misuse of the fixer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixerError {
    #[error("token index {index} is out of range for a stream of {len} tokens")]
    IndexOutOfRange { index: usize, len: usize },
}

/// What happens when a changeset touches a token another changeset already
/// rewrote this round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The later changeset is rejected
    #[default]
    FirstWins,
    /// Every overlapping earlier changeset is withdrawn whole, then the later
    /// one commits
    LastWins,
}

/// Pending rewrite of a single token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TokenEdit {
    before: String,
    replacement: Option<String>,
    after: String,
}

impl TokenEdit {
    fn apply(&self, original: &str) -> String {
        let body = self.replacement.as_deref().unwrap_or(original);
        let mut out = String::with_capacity(self.before.len() + body.len() + self.after.len());
        out.push_str(&self.before);
        out.push_str(body);
        out.push_str(&self.after);
        out
    }
}

#[derive(Debug, Default)]
struct Changeset {
    edits: BTreeMap<usize, TokenEdit>,
    fault: Option<FixerError>,
}

#[derive(Debug)]
struct Committed {
    edits: BTreeMap<usize, TokenEdit>,
    active: bool,
}

/// Rewrite engine for one round of one file
#[derive(Debug)]
pub struct Fixer {
    originals: Vec<String>,
    eol: &'static str,
    policy: CollisionPolicy,
    enabled: bool,
    open: Option<Changeset>,
    committed: Vec<Committed>,
    /// Token index to the committed changeset that owns it
    owners: HashMap<usize, usize>,
    rejected: usize,
}

impl Fixer {
    /// Start a round over `stream`. A disabled fixer validates operations
    /// but never commits.
    pub fn new(stream: &TokenStream, policy: CollisionPolicy, enabled: bool) -> Self {
        Self {
            originals: stream.iter().map(|t| t.text.clone()).collect(),
            eol: stream.eol(),
            policy,
            enabled,
            open: None,
            committed: Vec::new(),
            owners: HashMap::new(),
            rejected: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Line ending inserted by [`insert_newline`](Self::insert_newline)
    pub fn eol(&self) -> &'static str {
        self.eol
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn in_changeset(&self) -> bool {
        self.open.is_some()
    }

    /// Open a changeset; a changeset already open is discarded
    pub fn begin_changeset(&mut self) {
        if let Some(previous) = self.open.take() {
            logging::log(&format!(
                "Discarding unfinished changeset with {} edit(s)",
                previous.edits.len()
            ));
        }
        self.open = Some(Changeset::default());
    }

    /// Close the open changeset
    ///
    /// Returns `Ok(true)` when it committed and `Ok(false)` when it was empty,
    /// collided, or fixing is disabled. A changeset poisoned by an invalid
    /// operation is discarded and its first error returned.
    pub fn end_changeset(&mut self) -> Result<bool, FixerError> {
        let Some(changeset) = self.open.take() else {
            return Ok(false);
        };
        if let Some(fault) = changeset.fault {
            logging::log(&format!("Rejected changeset: {}", fault));
            return Err(fault);
        }
        Ok(self.commit(changeset.edits))
    }

    /// Discard the open changeset without applying anything
    pub fn rollback_changeset(&mut self) {
        self.open = None;
    }

    /// Replace the whole content of token `index`
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> Result<(), FixerError> {
        let text = text.into();
        self.stage(index, move |edit| {
            edit.before.clear();
            edit.after.clear();
            edit.replacement = Some(text);
        })
    }

    /// Prepend `text` to token `index`
    pub fn insert_before(&mut self, index: usize, text: impl Into<String>) -> Result<(), FixerError> {
        let text = text.into();
        self.stage(index, move |edit| edit.before.insert_str(0, &text))
    }

    /// Append `text` to token `index`
    pub fn insert_after(&mut self, index: usize, text: impl Into<String>) -> Result<(), FixerError> {
        let text = text.into();
        self.stage(index, move |edit| edit.after.push_str(&text))
    }

    /// Append a line break after token `index`
    pub fn insert_newline(&mut self, index: usize) -> Result<(), FixerError> {
        self.insert_after(index, self.eol)
    }

    /// Prepend a line break to token `index`
    pub fn insert_newline_before(&mut self, index: usize) -> Result<(), FixerError> {
        self.insert_before(index, self.eol)
    }

    /// Content of token `index` with committed changesets applied
    pub fn token_content(&self, index: usize) -> Option<String> {
        let original = self.originals.get(index)?;
        Some(match self.owners.get(&index) {
            Some(&owner) => self.committed[owner]
                .edits
                .get(&index)
                .map_or_else(|| original.clone(), |edit| edit.apply(original)),
            None => original.clone(),
        })
    }

    /// Number of changesets currently committed
    pub fn commit_count(&self) -> usize {
        self.committed.iter().filter(|c| c.active).count()
    }

    /// Number of changesets rejected or withdrawn by collisions
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// The round's output text
    pub fn contents(&self) -> String {
        (0..self.originals.len())
            .filter_map(|i| self.token_content(i))
            .collect()
    }

    fn stage(&mut self, index: usize, op: impl FnOnce(&mut TokenEdit)) -> Result<(), FixerError> {
        let len = self.originals.len();
        let implicit = self.open.is_none();
        if implicit {
            self.open = Some(Changeset::default());
        }

        let result = match self.open.as_mut() {
            Some(changeset) if index >= len => {
                let error = FixerError::IndexOutOfRange { index, len };
                changeset.fault.get_or_insert_with(|| error.clone());
                Err(error)
            }
            Some(changeset) => {
                if changeset.fault.is_none() {
                    op(changeset.edits.entry(index).or_default());
                }
                Ok(())
            }
            None => Ok(()),
        };

        if implicit {
            // A single operation outside a changeset commits on its own
            let committed = self.end_changeset();
            return result.and(committed.map(|_| ()));
        }
        result
    }

    fn commit(&mut self, edits: BTreeMap<usize, TokenEdit>) -> bool {
        if edits.is_empty() || !self.enabled {
            return false;
        }

        let mut overlapping: Vec<usize> = edits
            .keys()
            .filter_map(|index| self.owners.get(index).copied())
            .collect();
        overlapping.sort_unstable();
        overlapping.dedup();

        if !overlapping.is_empty() {
            match self.policy {
                CollisionPolicy::FirstWins => {
                    self.rejected += 1;
                    logging::log(&format!(
                        "Rejected changeset touching {} token(s): collides with an earlier changeset",
                        edits.len()
                    ));
                    return false;
                }
                CollisionPolicy::LastWins => {
                    for owner in overlapping {
                        let withdrawn = &mut self.committed[owner];
                        withdrawn.active = false;
                        for index in withdrawn.edits.keys() {
                            self.owners.remove(index);
                        }
                        self.rejected += 1;
                        logging::log(&format!("Withdrew earlier changeset #{}", owner));
                    }
                }
            }
        }

        let id = self.committed.len();
        for &index in edits.keys() {
            self.owners.insert(index, id);
        }
        self.committed.push(Committed { edits, active: true });
        true
    }
}
