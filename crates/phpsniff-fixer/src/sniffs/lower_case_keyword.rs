//! Lowercase PHP keywords

use phpsniff_core::TokenKind;

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

/// Keywords must be written in lowercase
///
/// `true`, `false` and `null` are left to `Generic.PHP.LowerCaseConstant`.
pub struct LowerCaseKeywordSniff;

impl Sniff for LowerCaseKeywordSniff {
    fn code(&self) -> &'static str {
        "Generic.PHP.LowerCaseKeyword"
    }

    fn description(&self) -> &'static str {
        "PHP keywords must be lowercase"
    }

    fn register(&self) -> Vec<TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(|kind| kind.is_keyword())
            .filter(|kind| !matches!(kind, TokenKind::True | TokenKind::False | TokenKind::Null))
            .collect()
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let found = &file.stream()[ptr].text;
        let expected = found.to_ascii_lowercase();
        if *found == expected {
            return Ok(());
        }

        let message = format!(
            "PHP keywords must be lowercase; expected \"{}\" but found \"{}\"",
            expected, found
        );
        if file.add_fixable_error(message, ptr, "Found") {
            file.fixer().replace(ptr, expected)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::test_support::{check, fix};

    #[test]
    fn test_lowercase_unchanged() {
        assert!(check(LowerCaseKeywordSniff, "<?php\nif ($a) { return true; }\n").is_empty());
    }

    #[test]
    fn test_mixed_case() {
        let diagnostics = check(LowerCaseKeywordSniff, "<?php\nIf ($a) { Return TRUE; }\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, "Generic.PHP.LowerCaseKeyword.Found");
        assert!(diagnostics[0].message.contains("expected \"if\" but found \"If\""));
        assert_eq!((diagnostics[1].line, diagnostics[1].column), (2, 11));
    }

    #[test]
    fn test_fix() {
        let report = fix(LowerCaseKeywordSniff, "<?php\nABSTRACT CLASS Foo EXTENDS Bar {}\n");
        assert_eq!(report.source, "<?php\nabstract class Foo extends Bar {}\n");
        assert_eq!(report.fixed, 3);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_skip_strings_comments_and_members() {
        let source = "<?php\n$a = 'IF this is a STRING'; // RETURN\n$o->CLASS; Foo::FUNCTION();\n";
        assert!(check(LowerCaseKeywordSniff, source).is_empty());
    }
}
