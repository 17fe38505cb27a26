//! Structural indexer
//!
//! Second pass over a token list: links bracket pairs, finds scope bodies of
//! declarations and control structures, records the enclosing scopes of every
//! token and groups doc-comment tags under their open tag.
//!
//! Malformed source never produces a wrong link. Anything that cannot be
//! matched is left as `None`, which consumers treat as "cannot analyze".

use crate::token::{Token, TokenKind, SCOPE_OWNERS};

/// Compute every structural link in place
pub fn index(tokens: &mut [Token]) {
    match_brackets(tokens);
    link_parenthesis_owners(tokens);
    link_scopes(tokens);
    link_conditions(tokens);
    group_doc_comments(tokens);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Parenthesis,
    Square,
    Curly,
}

fn family(kind: TokenKind) -> Option<Family> {
    match kind {
        TokenKind::OpenParenthesis | TokenKind::CloseParenthesis => Some(Family::Parenthesis),
        TokenKind::OpenSquareBracket | TokenKind::CloseSquareBracket | TokenKind::AttributeStart => {
            Some(Family::Square)
        }
        TokenKind::OpenCurlyBracket | TokenKind::CloseCurlyBracket => Some(Family::Curly),
        _ => None,
    }
}

/// Stack-based matcher
///
/// A closer links to the nearest open opener of its own family. Openers of
/// other families that are still open inside that pair are popped unmatched,
/// so links never cross. A closer with no opener of its family stays unlinked.
fn match_brackets(tokens: &mut [Token]) {
    let mut stack: Vec<(usize, Family)> = Vec::new();

    for i in 0..tokens.len() {
        let kind = tokens[i].kind;
        let Some(fam) = family(kind) else {
            continue;
        };

        if kind.is_opener() {
            stack.push((i, fam));
            continue;
        }

        if let Some(depth) = stack.iter().rposition(|(_, f)| *f == fam) {
            let (opener, _) = stack[depth];
            stack.truncate(depth);
            tokens[opener].partner = Some(i);
            tokens[i].partner = Some(opener);
        }
    }
}

/// Kinds that own the parenthesis pair directly following them
const PARENTHESIS_OWNERS: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::Fn,
    TokenKind::If,
    TokenKind::Elseif,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::While,
    TokenKind::Switch,
    TokenKind::Catch,
    TokenKind::Declare,
    TokenKind::Match,
    TokenKind::Array,
    TokenKind::List,
    TokenKind::Isset,
    TokenKind::Unset,
    TokenKind::Empty,
    TokenKind::Exit,
    TokenKind::Eval,
    TokenKind::Use,
    TokenKind::Class,
];

fn link_parenthesis_owners(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::OpenParenthesis {
            continue;
        }
        let Some(closer) = tokens[i].partner else {
            continue;
        };

        let Some(owner) = parenthesis_owner(tokens, i) else {
            continue;
        };
        tokens[i].parenthesis_owner = Some(owner);
        tokens[closer].parenthesis_owner = Some(owner);
    }
}

fn parenthesis_owner(tokens: &[Token], open: usize) -> Option<usize> {
    let prev = previous_code(tokens, open)?;
    let kind = tokens[prev].kind;

    if PARENTHESIS_OWNERS.contains(&kind) {
        return Some(prev);
    }

    // function name(...) and function &name(...)
    if kind == TokenKind::String {
        let mut before = previous_code(tokens, prev)?;
        if tokens[before].kind == TokenKind::BitwiseAnd {
            before = previous_code(tokens, before)?;
        }
        if tokens[before].kind == TokenKind::Function {
            return Some(before);
        }
    }

    None
}

fn link_scopes(tokens: &mut [Token]) {
    for owner in 0..tokens.len() {
        if !SCOPE_OWNERS.contains(&tokens[owner].kind) {
            continue;
        }
        let Some(opener) = find_scope_opener(tokens, owner) else {
            continue;
        };
        let Some(closer) = tokens[opener].partner else {
            continue;
        };

        tokens[owner].scope_opener = Some(opener);
        tokens[owner].scope_closer = Some(closer);
        for brace in [opener, closer] {
            tokens[brace].scope_opener = Some(opener);
            tokens[brace].scope_closer = Some(closer);
            tokens[brace].scope_condition = Some(owner);
        }
    }
}

/// Locate the `{` opening the body of the scope owner at `owner`
fn find_scope_opener(tokens: &[Token], owner: usize) -> Option<usize> {
    match tokens[owner].kind {
        TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum => {
            if let Some(prev) = previous_code(tokens, owner) {
                if matches!(
                    tokens[prev].kind,
                    TokenKind::DoubleColon | TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator
                ) {
                    return None;
                }
            }
            scan_to_brace(tokens, owner + 1, true)
        }
        TokenKind::Function => {
            let mut next = next_code(tokens, owner)?;
            if tokens[next].kind == TokenKind::BitwiseAnd {
                next = next_code(tokens, next)?;
            }
            if tokens[next].kind == TokenKind::String || tokens[next].kind.is_keyword() {
                next = next_code(tokens, next)?;
            }
            if tokens[next].kind != TokenKind::OpenParenthesis {
                return None;
            }
            let close = tokens[next].partner?;
            scan_to_brace(tokens, close + 1, false)
        }
        TokenKind::If
        | TokenKind::Elseif
        | TokenKind::For
        | TokenKind::Foreach
        | TokenKind::While
        | TokenKind::Switch
        | TokenKind::Catch
        | TokenKind::Declare
        | TokenKind::Match => {
            let open = next_code(tokens, owner)?;
            if tokens[open].kind != TokenKind::OpenParenthesis {
                return None;
            }
            let close = tokens[open].partner?;
            let brace = next_code(tokens, close)?;
            (tokens[brace].kind == TokenKind::OpenCurlyBracket).then_some(brace)
        }
        TokenKind::Else | TokenKind::Do | TokenKind::Try | TokenKind::Finally => {
            let brace = next_code(tokens, owner)?;
            (tokens[brace].kind == TokenKind::OpenCurlyBracket).then_some(brace)
        }
        TokenKind::Namespace => {
            let mut next = next_code(tokens, owner)?;
            if tokens[next].kind.is_name() {
                next = next_code(tokens, next)?;
            }
            (tokens[next].kind == TokenKind::OpenCurlyBracket).then_some(next)
        }
        _ => None,
    }
}

/// Walk a declaration header looking for its body, hopping over parenthesis
/// groups (constructor arguments, closure `use`, DNF types). Any token that
/// cannot appear in a header ends the search without a scope. Commas are
/// allowed only in class-like headers, where they separate `implements` and
/// `extends` names.
fn scan_to_brace(tokens: &[Token], from: usize, class_like: bool) -> Option<usize> {
    let mut i = from;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::OpenCurlyBracket => return Some(i),
            TokenKind::OpenParenthesis => i = tokens[i].partner?,
            TokenKind::Comma if class_like => {}
            TokenKind::Semicolon
            | TokenKind::CloseCurlyBracket
            | TokenKind::CloseParenthesis
            | TokenKind::CloseSquareBracket
            | TokenKind::Comma
            | TokenKind::Equal
            | TokenKind::DoubleArrow
            | TokenKind::CloseTag => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

fn link_conditions(tokens: &mut [Token]) {
    // (owner, owner kind, closer)
    let mut stack: Vec<(usize, TokenKind, usize)> = Vec::new();

    for i in 0..tokens.len() {
        while stack.last().map_or(false, |(_, _, closer)| *closer <= i) {
            stack.pop();
        }

        tokens[i].conditions = stack.iter().map(|(owner, kind, _)| (*owner, *kind)).collect();

        if tokens[i].kind == TokenKind::OpenCurlyBracket {
            if let (Some(owner), Some(closer)) = (tokens[i].scope_condition, tokens[i].scope_closer) {
                stack.push((owner, tokens[owner].kind, closer));
            }
        }
    }
}

fn group_doc_comments(tokens: &mut [Token]) {
    for open in 0..tokens.len() {
        if tokens[open].kind != TokenKind::DocCommentOpenTag {
            continue;
        }

        let mut tags = Vec::new();
        let mut closer = None;
        for (i, token) in tokens.iter().enumerate().skip(open + 1) {
            match token.kind {
                TokenKind::DocCommentTag => tags.push(i),
                TokenKind::DocCommentCloseTag => {
                    closer = Some(i);
                    break;
                }
                TokenKind::DocCommentStar
                | TokenKind::DocCommentWhitespace
                | TokenKind::DocCommentString => {}
                _ => break,
            }
        }

        tokens[open].comment_tags = tags;
        tokens[open].comment_closer = closer;
    }
}

fn next_code(tokens: &[Token], from: usize) -> Option<usize> {
    (from + 1..tokens.len()).find(|&i| !tokens[i].kind.is_empty())
}

fn previous_code(tokens: &[Token], from: usize) -> Option<usize> {
    (0..from).rev().find(|&i| !tokens[i].kind.is_empty())
}
