//! PHP tokenizer
//!
//! Turns source text into a flat token list. Tokenization never fails:
//! anything that cannot be classified (stray bytes, unterminated literals)
//! becomes a `T_UNKNOWN` token, so concatenating the text of every token
//! always reproduces the input byte for byte.

use crate::token::{keyword, Token, TokenKind};

/// Operators and punctuation, longest first so the first match wins
const OPERATORS: &[(&str, TokenKind)] = &[
    ("<=>", TokenKind::Spaceship),
    ("**=", TokenKind::PowEqual),
    ("...", TokenKind::Ellipsis),
    ("<<=", TokenKind::SlEqual),
    (">>=", TokenKind::SrEqual),
    ("===", TokenKind::IsIdentical),
    ("!==", TokenKind::IsNotIdentical),
    ("??=", TokenKind::CoalesceEqual),
    ("?->", TokenKind::NullsafeObjectOperator),
    ("**", TokenKind::Pow),
    ("++", TokenKind::Inc),
    ("--", TokenKind::Dec),
    ("->", TokenKind::ObjectOperator),
    ("=>", TokenKind::DoubleArrow),
    ("::", TokenKind::DoubleColon),
    ("==", TokenKind::IsEqual),
    ("!=", TokenKind::IsNotEqual),
    ("<>", TokenKind::IsNotEqual),
    ("<=", TokenKind::IsSmallerOrEqual),
    (">=", TokenKind::IsGreaterOrEqual),
    ("&&", TokenKind::BooleanAnd),
    ("||", TokenKind::BooleanOr),
    ("??", TokenKind::Coalesce),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::MulEqual),
    ("/=", TokenKind::DivEqual),
    (".=", TokenKind::ConcatEqual),
    ("%=", TokenKind::ModEqual),
    ("&=", TokenKind::AndEqual),
    ("|=", TokenKind::OrEqual),
    ("^=", TokenKind::XorEqual),
    ("<<", TokenKind::Sl),
    (">>", TokenKind::Sr),
    ("(", TokenKind::OpenParenthesis),
    (")", TokenKind::CloseParenthesis),
    ("[", TokenKind::OpenSquareBracket),
    ("]", TokenKind::CloseSquareBracket),
    ("{", TokenKind::OpenCurlyBracket),
    ("}", TokenKind::CloseCurlyBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    ("=", TokenKind::Equal),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Multiply),
    ("/", TokenKind::Divide),
    ("%", TokenKind::Modulus),
    (".", TokenKind::StringConcat),
    ("!", TokenKind::BooleanNot),
    ("&", TokenKind::BitwiseAnd),
    ("|", TokenKind::BitwiseOr),
    ("^", TokenKind::BitwiseXor),
    ("~", TokenKind::BitwiseNot),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("?", TokenKind::InlineThen),
    ("@", TokenKind::At),
    ("$", TokenKind::Dollar),
    ("\\", TokenKind::NsSeparator),
];

const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "binary", "array",
    "object", "unset",
];

/// Tokenize PHP source
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).run()
}

/// Single-use tokenizer state
pub struct Tokenizer<'src> {
    source: &'src str,
    /// Current byte position
    pos: usize,
    /// Current line (1-indexed)
    line: usize,
    /// Current column (1-indexed, in characters)
    column: usize,
    /// Current bracket depth
    level: usize,
    /// Inside `<?php ... ?>`
    in_php: bool,
    tokens: Vec<Token>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            level: 0,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    /// Consume the whole source
    pub fn run(mut self) -> Vec<Token> {
        while self.pos < self.source.len() {
            if self.in_php {
                self.scan_php();
            } else {
                self.scan_html();
            }
        }
        self.tokens
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Emit the next `len` bytes as one token and advance past them
    fn push(&mut self, kind: TokenKind, len: usize) {
        debug_assert!(len > 0, "empty {} token", kind);
        let text = &self.source[self.pos..self.pos + len];

        if kind.is_closer() {
            self.level = self.level.saturating_sub(1);
        }

        let mut token = Token::new(kind, text, self.line, self.column, self.pos);
        token.level = self.level;

        if kind.is_opener() {
            self.level += 1;
        }

        self.advance_position(text);
        self.pos += len;
        self.tokens.push(token);
    }

    fn advance_position(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    self.line += 1;
                    self.column = 1;
                }
                _ => self.column += 1,
            }
        }
    }

    /// Kind of the last token that is not whitespace or a comment
    fn previous_code_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .find(|t| !t.kind.is_empty())
            .map(|t| t.kind)
    }

    fn scan_html(&mut self) {
        let rest = self.rest();
        match find_open_tag(rest) {
            Some(0) => self.scan_open_tag(),
            Some(n) => self.push(TokenKind::InlineHtml, n),
            None => self.push(TokenKind::InlineHtml, rest.len()),
        }
    }

    fn scan_open_tag(&mut self) {
        let rest = self.rest();
        self.in_php = true;

        if rest.starts_with("<?=") {
            self.push(TokenKind::OpenTagWithEcho, 3);
            return;
        }

        let after = &rest[5..];
        let trailing = if after.starts_with("\r\n") {
            2
        } else if after.starts_with([' ', '\t', '\n', '\r']) {
            1
        } else {
            0
        };
        self.push(TokenKind::OpenTag, 5 + trailing);
    }

    fn scan_php(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let next = bytes.get(1).copied();

        match bytes[0] {
            b if is_whitespace(b) => {
                let len = bytes.iter().take_while(|b| is_whitespace(**b)).count();
                self.push(TokenKind::Whitespace, len);
            }
            b'?' if rest.starts_with("?>") => self.scan_close_tag(),
            b'#' if next == Some(b'[') => self.push(TokenKind::AttributeStart, 2),
            b'#' => self.scan_line_comment(),
            b'/' if next == Some(b'/') => self.scan_line_comment(),
            b'/' if rest.starts_with("/**")
                && bytes.get(3).map_or(false, |b| is_whitespace(*b)) =>
            {
                self.scan_doc_comment()
            }
            b'/' if next == Some(b'*') => {
                let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
                self.push(TokenKind::Comment, len);
            }
            b'$' if next.map_or(false, is_ident_start) => {
                let len = 1 + ident_len(&bytes[1..]);
                self.push(TokenKind::Variable, len);
            }
            b'\'' => self.scan_quoted(b'\''),
            b'"' => self.scan_quoted(b'"'),
            b'`' => self.scan_quoted(b'`'),
            b'<' if rest.starts_with("<<<") => {
                if !self.scan_heredoc() {
                    self.scan_operator();
                }
            }
            b'(' => match cast_len(rest) {
                Some(len) => self.push(TokenKind::Cast, len),
                None => self.scan_operator(),
            },
            b'0'..=b'9' => self.scan_number(),
            b'.' if next.map_or(false, |b| b.is_ascii_digit()) => self.scan_number(),
            b'\\' if next.map_or(false, is_ident_start) => self.scan_name(),
            b if is_ident_start(b) => self.scan_name(),
            _ => self.scan_operator(),
        }
    }

    fn scan_close_tag(&mut self) {
        let after = &self.rest()[2..];
        let trailing = if after.starts_with("\r\n") {
            2
        } else if after.starts_with('\n') {
            1
        } else {
            0
        };
        self.push(TokenKind::CloseTag, 2 + trailing);
        self.in_php = false;
    }

    /// `//` and `#` comments run to the end of the line or to `?>`
    fn scan_line_comment(&mut self) {
        let bytes = self.rest().as_bytes();
        let mut len = 0;
        while len < bytes.len() {
            let closes = bytes[len] == b'?' && bytes.get(len + 1) == Some(&b'>');
            if bytes[len] == b'\n' || bytes[len] == b'\r' || closes {
                break;
            }
            len += 1;
        }
        self.push(TokenKind::Comment, len);
    }

    /// Split a doc comment into its open tag, stars, tags, strings,
    /// whitespace and close tag
    fn scan_doc_comment(&mut self) {
        let rest = self.rest();
        let (len, closed) = match rest[3..].find("*/") {
            Some(i) => (i + 5, true),
            None => (rest.len(), false),
        };
        let body_end = if closed { len - 2 } else { len };
        let comment = &rest[..len];

        self.push(TokenKind::DocCommentOpenTag, 3);

        let mut i = 3;
        let mut line_start = false;
        let mut content_start = true;

        while i < body_end {
            let part = &comment[i..body_end];
            let bytes = part.as_bytes();

            let (kind, n) = match bytes[0] {
                b'\n' => (TokenKind::DocCommentWhitespace, 1),
                b'\r' => (
                    TokenKind::DocCommentWhitespace,
                    if part.starts_with("\r\n") { 2 } else { 1 },
                ),
                b' ' | b'\t' => (
                    TokenKind::DocCommentWhitespace,
                    bytes.iter().take_while(|b| **b == b' ' || **b == b'\t').count(),
                ),
                b'*' if line_start => (
                    TokenKind::DocCommentStar,
                    bytes.iter().take_while(|b| **b == b'*').count(),
                ),
                b'@' if content_start && bytes.get(1).map_or(false, |b| b.is_ascii_alphabetic() || *b == b'\\') => {
                    let tag_len = 1 + bytes[1..]
                        .iter()
                        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'\\'))
                        .count();
                    (TokenKind::DocCommentTag, tag_len)
                }
                _ => {
                    let line_len = part.find(['\n', '\r']).unwrap_or(part.len());
                    let trimmed = part[..line_len].trim_end_matches([' ', '\t']);
                    (TokenKind::DocCommentString, trimmed.len())
                }
            };

            self.push(kind, n);
            i += n;

            match kind {
                TokenKind::DocCommentWhitespace if bytes[0] == b'\n' || bytes[0] == b'\r' => {
                    line_start = true;
                    content_start = true;
                }
                TokenKind::DocCommentWhitespace => {}
                TokenKind::DocCommentStar => {
                    line_start = false;
                    content_start = true;
                }
                _ => {
                    line_start = false;
                    content_start = false;
                }
            }
        }

        if closed {
            self.push(TokenKind::DocCommentCloseTag, 2);
        }
    }

    /// Single-quoted, double-quoted and backtick strings; unterminated
    /// literals become one unknown token running to EOF
    fn scan_quoted(&mut self, quote: u8) {
        let bytes = self.rest().as_bytes();
        let mut i = 1;
        let mut interpolated = false;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 2;
                    continue;
                }
                b'$' if quote != b'\'' => {
                    if bytes.get(i + 1).map_or(false, |b| is_ident_start(*b) || *b == b'{') {
                        interpolated = true;
                    }
                }
                b'{' if quote != b'\'' && bytes.get(i + 1) == Some(&b'$') => interpolated = true,
                b if b == quote => {
                    let kind = match quote {
                        b'`' => TokenKind::Backtick,
                        b'"' if interpolated => TokenKind::DoubleQuotedString,
                        _ => TokenKind::ConstantEncapsedString,
                    };
                    self.push(kind, i + 1);
                    return;
                }
                _ => {}
            }
            i += 1;
        }

        self.push(TokenKind::Unknown, bytes.len());
    }

    /// Heredoc and nowdoc; returns false when `<<<` does not start one
    fn scan_heredoc(&mut self) -> bool {
        let rest = self.rest();
        let Some(header) = heredoc_header(rest) else {
            return false;
        };

        let (start_kind, body_kind, end_kind) = if header.nowdoc {
            (TokenKind::StartNowdoc, TokenKind::Nowdoc, TokenKind::EndNowdoc)
        } else {
            (TokenKind::StartHeredoc, TokenKind::Heredoc, TokenKind::EndHeredoc)
        };

        self.push(start_kind, header.len);

        let body = &rest[header.len..];
        let mut line = 0;
        loop {
            let indent = body[line..]
                .bytes()
                .take_while(|b| *b == b' ' || *b == b'\t')
                .count();
            let candidate = &body[line + indent..];
            if candidate.starts_with(header.label)
                && !candidate.as_bytes().get(header.label.len()).map_or(false, |b| is_ident_continue(*b))
            {
                if line > 0 {
                    self.push(body_kind, line);
                }
                self.push(end_kind, indent + header.label.len());
                return true;
            }

            match body[line..].find('\n') {
                Some(nl) => line += nl + 1,
                None => break,
            }
        }

        if !body.is_empty() {
            self.push(TokenKind::Unknown, body.len());
        }
        true
    }

    fn scan_number(&mut self) {
        let bytes = self.rest().as_bytes();
        let prefixed = |p: u8| bytes.len() > 2 && bytes[0] == b'0' && bytes[1].to_ascii_lowercase() == p;

        if prefixed(b'x') || prefixed(b'b') || prefixed(b'o') {
            let len = 2 + bytes[2..]
                .iter()
                .take_while(|b| b.is_ascii_hexdigit() || **b == b'_')
                .count();
            self.push(TokenKind::LNumber, len);
            return;
        }

        let digits = |from: usize| {
            bytes[from..]
                .iter()
                .take_while(|b| b.is_ascii_digit() || **b == b'_')
                .count()
        };

        let mut len = digits(0);
        let mut kind = TokenKind::LNumber;

        if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).map_or(false, |b| b.is_ascii_digit()) {
            len += 1 + digits(len + 1);
            kind = TokenKind::DNumber;
        }

        if matches!(bytes.get(len), Some(b'e') | Some(b'E')) {
            let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+') | Some(b'-')));
            if bytes.get(len + 1 + sign).map_or(false, |b| b.is_ascii_digit()) {
                len += 1 + sign + digits(len + 1 + sign);
                kind = TokenKind::DNumber;
            }
        }

        self.push(kind, len);
    }

    /// Identifiers, keywords and namespaced names
    fn scan_name(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut len = usize::from(bytes[0] == b'\\');

        loop {
            len += ident_len(&bytes[len..]);
            if bytes.get(len) == Some(&b'\\') && bytes.get(len + 1).map_or(false, |b| is_ident_start(*b)) {
                len += 1;
            } else {
                break;
            }
        }

        let name = &rest[..len];
        let kind = if name.starts_with('\\') {
            TokenKind::NameFullyQualified
        } else if name.contains('\\') {
            if name.to_ascii_lowercase().starts_with("namespace\\") {
                TokenKind::NameRelative
            } else {
                TokenKind::NameQualified
            }
        } else {
            self.classify_word(name, &rest[len..])
        };

        self.push(kind, len);
    }

    /// Resolve a bare word to a keyword or identifier, using the previous
    /// code token for context
    fn classify_word(&self, word: &str, after: &str) -> TokenKind {
        let Some(kind) = keyword(word) else {
            return TokenKind::String;
        };

        match self.previous_code_kind() {
            Some(TokenKind::ObjectOperator) | Some(TokenKind::NullsafeObjectOperator) => {
                return TokenKind::String
            }
            Some(TokenKind::DoubleColon) if kind != TokenKind::Class => return TokenKind::String,
            Some(TokenKind::Function) | Some(TokenKind::Const) => return TokenKind::String,
            _ => {}
        }

        if kind == TokenKind::Enum {
            let gap = after.bytes().take_while(|b| is_whitespace(*b)).count();
            let followed_by_name = gap > 0 && after.as_bytes().get(gap).map_or(false, |b| is_ident_start(*b));
            if !followed_by_name {
                return TokenKind::String;
            }
        }

        kind
    }

    fn scan_operator(&mut self) {
        let rest = self.rest();
        for (op, kind) in OPERATORS {
            if rest.starts_with(op) {
                self.push(*kind, op.len());
                return;
            }
        }

        let len = rest.chars().next().map_or(1, char::len_utf8);
        self.push(TokenKind::Unknown, len);
    }
}

struct HeredocHeader<'a> {
    label: &'a str,
    nowdoc: bool,
    /// Length of `<<<LABEL` including its line break
    len: usize,
}

fn heredoc_header(rest: &str) -> Option<HeredocHeader<'_>> {
    let bytes = rest.as_bytes();
    let mut i = 3;
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }

    let quote = match bytes.get(i) {
        Some(b'\'') | Some(b'"') => {
            i += 1;
            Some(bytes[i - 1])
        }
        _ => None,
    };

    if !bytes.get(i).map_or(false, |b| is_ident_start(*b)) {
        return None;
    }
    let label_start = i;
    i += ident_len(&bytes[i..]);
    let label = &rest[label_start..i];

    if let Some(q) = quote {
        if bytes.get(i) != Some(&q) {
            return None;
        }
        i += 1;
    }

    if rest[i..].starts_with("\r\n") {
        i += 2;
    } else if rest[i..].starts_with('\n') {
        i += 1;
    } else {
        return None;
    }

    Some(HeredocHeader {
        label,
        nowdoc: quote == Some(b'\''),
        len: i,
    })
}

/// Byte index of the next `<?php` or `<?=` open tag
fn find_open_tag(text: &str) -> Option<usize> {
    text.match_indices("<?").map(|(i, _)| i).find(|&i| {
        let candidate = &text[i..];
        if candidate.starts_with("<?=") {
            return true;
        }
        candidate.len() >= 5
            && candidate.as_bytes()[2..5].eq_ignore_ascii_case(b"php")
            && candidate.as_bytes().get(5).map_or(true, |b| is_whitespace(*b))
    })
}

/// Length of a cast such as `( int )`, if `text` starts with one
fn cast_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 1;
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    let word_start = i;
    while bytes.get(i).map_or(false, |b| b.is_ascii_alphabetic()) {
        i += 1;
    }
    let word = text[word_start..i].to_ascii_lowercase();
    if !CAST_TYPES.contains(&word.as_str()) {
        return None;
    }
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    (bytes.get(i) == Some(&b')')).then_some(i + 1)
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn ident_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| is_ident_continue(**b)).count()
}
