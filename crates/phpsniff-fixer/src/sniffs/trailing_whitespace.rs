//! No whitespace at the end of a line

use std::sync::OnceLock;

use phpsniff_core::TokenKind;
use regex::Regex;

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

/// Spaces and tabs directly before a line break
fn trailing() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(r"[ \t]+(\r\n|\n|\r)") {
        Ok(re) => re,
        Err(e) => unreachable!("static pattern: {}", e),
    })
}

pub struct TrailingWhitespaceSniff;

impl Sniff for TrailingWhitespaceSniff {
    fn code(&self) -> &'static str {
        "Generic.WhiteSpace.TrailingWhitespace"
    }

    fn description(&self) -> &'static str {
        "Lines must not end with whitespace"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![
            TokenKind::OpenTag,
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::DocCommentWhitespace,
        ]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();
        let mut text = stream[ptr].text.clone();

        // Line comments, open tags and doc comment blanks stop before their
        // line break, which starts the next token
        let break_follows = !text.ends_with(['\n', '\r'])
            && stream
                .get(ptr + 1)
                .map_or(false, |next| next.text.starts_with(['\n', '\r']));
        if break_follows {
            text.push('\n');
        }

        if !trailing().is_match(&text) {
            return Ok(());
        }

        if file.add_fixable_error("Whitespace found at end of line", ptr, "Found") {
            let mut fixed = trailing().replace_all(&text, "$1").into_owned();
            if break_follows {
                fixed.pop();
            }
            file.fixer().replace(ptr, fixed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::test_support::{check, fix};

    #[test]
    fn test_clean_source() {
        assert!(check(TrailingWhitespaceSniff, "<?php\n$a = 1;\n\n$b = 2;\n").is_empty());
    }

    #[test]
    fn test_trailing_spaces_after_code() {
        let diagnostics = check(TrailingWhitespaceSniff, "<?php\n$a = 1;   \n$b = 2;\t\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_fix_preserves_line_endings() {
        let report = fix(TrailingWhitespaceSniff, "<?php\r\n$a = 1;  \r\n  \r\n$b = 2;\r\n");
        assert_eq!(report.source, "<?php\r\n$a = 1;\r\n\r\n$b = 2;\r\n");
    }

    #[test]
    fn test_line_comment() {
        let report = fix(TrailingWhitespaceSniff, "<?php\n// note   \n$a = 1;\n");
        assert_eq!(report.source, "<?php\n// note\n$a = 1;\n");
    }

    #[test]
    fn test_block_comment() {
        let report = fix(TrailingWhitespaceSniff, "<?php\n/* one  \n   two */\n");
        assert_eq!(report.source, "<?php\n/* one\n   two */\n");
    }

    #[test]
    fn test_doc_comment_lines() {
        let source = "<?php\n/**\n * Summary.   \n * @var int\t\n */\n$a = 1;\n";
        let diagnostics = check(TrailingWhitespaceSniff, source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 3);
        assert_eq!(diagnostics[1].line, 4);

        let report = fix(TrailingWhitespaceSniff, source);
        assert_eq!(report.source, "<?php\n/**\n * Summary.\n * @var int\n */\n$a = 1;\n");
    }

    #[test]
    fn test_open_tag_followed_by_spaces() {
        let report = fix(TrailingWhitespaceSniff, "<?php \n$a = 1;\n");
        assert_eq!(report.source, "<?php\n$a = 1;\n");

        assert!(check(TrailingWhitespaceSniff, "<?php $a = 1;\n").is_empty());
    }

    #[test]
    fn test_strings_untouched() {
        let source = "<?php\n$a = 'x   \ny';\n";
        assert!(check(TrailingWhitespaceSniff, source).is_empty());
    }
}
