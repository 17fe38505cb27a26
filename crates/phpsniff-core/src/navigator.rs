//! Directional token search
//!
//! The primitives every rule uses to move around a [`TokenStream`]. All
//! searches are linear in the distance scanned and return `None` when
//! nothing matches inside the bounds.

use crate::stream::TokenStream;
use crate::token::{TokenKind, EMPTY_TOKENS, OO_SCOPE_OWNERS, STATEMENT_END};

/// Kinds that separate statements when scanning backward
const STATEMENT_BOUNDARIES: &[TokenKind] = &[
    TokenKind::Semicolon,
    TokenKind::OpenCurlyBracket,
    TokenKind::CloseCurlyBracket,
    TokenKind::OpenTag,
    TokenKind::OpenTagWithEcho,
    TokenKind::CloseTag,
];

impl TokenStream {
    /// First index in `from..end` whose kind is in `kinds`, or not in
    /// `kinds` when `exclude` is set
    ///
    /// `end` defaults to the end of the stream and is exclusive.
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        end: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        let end = end.unwrap_or(self.len()).min(self.len());
        (from..end).find(|&i| kinds.contains(&self[i].kind) != exclude)
    }

    /// Last index in `end..=from` matching like [`find_next`](Self::find_next),
    /// scanning backward from `from`
    ///
    /// `end` defaults to the start of the stream and is inclusive.
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        end: Option<usize>,
        exclude: bool,
    ) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let from = from.min(self.len() - 1);
        let end = end.unwrap_or(0);
        if end > from {
            return None;
        }
        (end..=from).rev().find(|&i| kinds.contains(&self[i].kind) != exclude)
    }

    /// Like [`find_next`](Self::find_next) but also requires the token text to
    /// equal `text`, ignoring ASCII case
    pub fn find_next_with_text(
        &self,
        kinds: &[TokenKind],
        from: usize,
        end: Option<usize>,
        text: &str,
    ) -> Option<usize> {
        let end = end.unwrap_or(self.len()).min(self.len());
        (from..end).find(|&i| kinds.contains(&self[i].kind) && self[i].text.eq_ignore_ascii_case(text))
    }

    /// First token at or after `from` that is not whitespace or a comment
    pub fn find_next_non_empty(&self, from: usize) -> Option<usize> {
        self.find_next(EMPTY_TOKENS, from, None, true)
    }

    /// Last token at or before `from` that is not whitespace or a comment
    pub fn find_previous_non_empty(&self, from: usize) -> Option<usize> {
        self.find_previous(EMPTY_TOKENS, from, None, true)
    }

    /// First code token of the statement containing `from`
    ///
    /// Bracketed groups are skipped as a whole, so a call spanning several
    /// lines is one statement.
    pub fn find_start_of_statement(&self, from: usize) -> usize {
        if from >= self.len() {
            return from;
        }

        let mut start = from;
        let mut i = from;
        loop {
            let token = &self[i];
            if i != from {
                if STATEMENT_BOUNDARIES.contains(&token.kind) {
                    return start;
                }
                if matches!(token.kind, TokenKind::CloseParenthesis | TokenKind::CloseSquareBracket) {
                    if let Some(opener) = token.partner {
                        i = opener;
                        start = opener;
                    }
                } else if !token.kind.is_empty() {
                    start = i;
                }
            }
            if i == 0 {
                return start;
            }
            i -= 1;
        }
    }

    /// Last token of the statement containing `from`: its `;` or close tag,
    /// or the last code token before a comma or an enclosing closer
    pub fn find_end_of_statement(&self, from: usize) -> usize {
        let mut last = from;
        let mut i = from;
        while i < self.len() {
            let token = &self[i];
            match token.kind {
                kind if STATEMENT_END.contains(&kind) => return i,
                TokenKind::Comma if i != from => return last,
                kind if kind.is_closer() && i != from => return last,
                kind if kind.is_opener() => match token.partner {
                    Some(closer) => {
                        i = closer;
                        last = closer;
                    }
                    None => return last,
                },
                kind if !kind.is_empty() => last = i,
                _ => {}
            }
            i += 1;
        }
        last
    }

    /// First token that starts on the same line as the token at `index`
    pub fn find_first_on_line(&self, index: usize) -> usize {
        let Some(token) = self.get(index) else {
            return index;
        };
        let mut i = index;
        while i > 0 && self[i - 1].line == token.line {
            i -= 1;
        }
        i
    }

    /// Name of a class-like or function declaration; `None` for anonymous
    /// classes and closures
    pub fn declaration_name(&self, owner: usize) -> Option<&str> {
        let token = self.get(owner)?;
        if !OO_SCOPE_OWNERS.contains(&token.kind) && token.kind != TokenKind::Function {
            return None;
        }

        let mut next = self.find_next_non_empty(owner + 1)?;
        if self[next].kind == TokenKind::BitwiseAnd {
            next = self.find_next_non_empty(next + 1)?;
        }
        (self[next].kind == TokenKind::String).then(|| self[next].text.as_str())
    }

    /// Whether the token at `index` sits inside a scope owned by any of `kinds`
    pub fn has_condition(&self, index: usize, kinds: &[TokenKind]) -> bool {
        self.get(index)
            .map_or(false, |t| t.conditions.iter().any(|(_, kind)| kinds.contains(kind)))
    }

    /// Innermost enclosing scope owner of `kind`
    pub fn get_condition(&self, index: usize, kind: TokenKind) -> Option<usize> {
        self.get(index)?
            .conditions
            .iter()
            .rev()
            .find(|(_, k)| *k == kind)
            .map(|(owner, _)| *owner)
    }

    /// Concatenated text of `length` tokens starting at `start`
    pub fn tokens_as_string(&self, start: usize, length: usize) -> String {
        let end = start.saturating_add(length).min(self.len());
        let start = start.min(end);
        self.as_slice()[start..end].iter().map(|t| t.text.as_str()).collect()
    }
}
