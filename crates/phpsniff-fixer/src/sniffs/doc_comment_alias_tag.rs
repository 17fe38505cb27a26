//! Canonical doc comment tags

use phpsniff_core::TokenKind;

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

/// Alias -> canonical tag
const ALIASES: &[(&str, &str)] = &[
    ("@type", "@var"),
    ("@link", "@see"),
    ("@property-read", "@property"),
    ("@property-write", "@property"),
];

pub struct DocCommentAliasTagSniff;

impl Sniff for DocCommentAliasTagSniff {
    fn code(&self) -> &'static str {
        "Generic.Commenting.DocCommentAliasTag"
    }

    fn description(&self) -> &'static str {
        "Doc comments must use canonical tag names"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::DocCommentOpenTag]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();

        for &tag in &stream[ptr].comment_tags {
            let found = stream[tag].text.as_str();
            let Some(&(_, canonical)) = ALIASES.iter().find(|(alias, _)| found.eq_ignore_ascii_case(alias)) else {
                continue;
            };

            let message = format!("Use {} instead of {}", canonical, found);
            if file.add_fixable_warning(message, tag, "Found") {
                file.fixer().replace(tag, canonical)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::test_support::{check, fix};

    #[test]
    fn test_canonical_tags_are_clean() {
        let source = "<?php\n/**\n * @var int\n * @see Foo\n */\n";
        assert!(check(DocCommentAliasTagSniff, source).is_empty());
    }

    #[test]
    fn test_aliases_fixed() {
        let source = "<?php\n/**\n * @type int\n * @property-read string $name\n * @link https://example.com\n */\n";
        let report = fix(DocCommentAliasTagSniff, source);
        assert_eq!(
            report.source,
            "<?php\n/**\n * @var int\n * @property string $name\n * @see https://example.com\n */\n"
        );
        assert_eq!(report.fixed, 3);
    }

    #[test]
    fn test_warning_points_at_tag() {
        let diagnostics = check(DocCommentAliasTagSniff, "<?php\n/** @type int */\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics[0].is_error());
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (2, 5));
    }

    #[test]
    fn test_unterminated_doc_comment() {
        let diagnostics = check(DocCommentAliasTagSniff, "<?php\n/**\n * @link x\n");
        assert_eq!(diagnostics.len(), 1);
    }
}
