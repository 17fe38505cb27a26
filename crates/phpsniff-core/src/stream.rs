//! The indexed token sequence of one round

use std::ops::Index;

use crate::indexer;
use crate::token::{Token, TokenKind, EMPTY_TOKENS};
use crate::tokenizer::tokenize;

/// Tokens of one source text with all structural links computed
///
/// A stream is immutable once built. Fixes never edit it; the next round
/// builds a fresh stream from the rewritten text.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    eol: &'static str,
}

/// Body of a scope owner, as seen by rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The declaration has no body (abstract or interface signature, or the
    /// braces could not be matched)
    Absent,
    /// Only whitespace between the braces
    Empty { opener: usize, closer: usize },
    Body { opener: usize, closer: usize },
}

impl TokenStream {
    /// Tokenize and index `source`
    pub fn parse(source: &str) -> Self {
        let mut tokens = tokenize(source);
        indexer::index(&mut tokens);
        Self {
            tokens,
            eol: detect_eol(source),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Line ending of the first line break in the source, `"\n"` if none
    pub fn eol(&self) -> &'static str {
        self.eol
    }

    /// Reassemble the source text
    pub fn source(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Classify the body of the scope owner at `owner`
    pub fn scope(&self, owner: usize) -> Scope {
        let Some(token) = self.tokens.get(owner) else {
            return Scope::Absent;
        };
        match (token.scope_opener, token.scope_closer) {
            (Some(opener), Some(closer)) => {
                let only_whitespace = self.tokens[opener + 1..closer]
                    .iter()
                    .all(|t| t.kind == TokenKind::Whitespace);
                if only_whitespace {
                    Scope::Empty { opener, closer }
                } else {
                    Scope::Body { opener, closer }
                }
            }
            _ => Scope::Absent,
        }
    }

    /// Whether the token at `index` is whitespace or a comment
    pub fn is_empty_token(&self, index: usize) -> bool {
        self.tokens.get(index).map_or(false, |t| t.is_any(EMPTY_TOKENS))
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Line ending used by the source, taken from its first line break
pub fn detect_eol(source: &str) -> &'static str {
    match source.find(['\n', '\r']) {
        Some(i) if source[i..].starts_with("\r\n") => "\r\n",
        Some(i) if source[i..].starts_with('\r') => "\r",
        _ => "\n",
    }
}
