//! Lowercase `true`, `false` and `null`

use phpsniff_core::TokenKind;

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

pub struct LowerCaseConstantSniff;

impl Sniff for LowerCaseConstantSniff {
    fn code(&self) -> &'static str {
        "Generic.PHP.LowerCaseConstant"
    }

    fn description(&self) -> &'static str {
        "TRUE, FALSE and NULL must be lowercase"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::True, TokenKind::False, TokenKind::Null]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let found = &file.stream()[ptr].text;
        let expected = found.to_ascii_lowercase();
        if *found == expected {
            return Ok(());
        }

        let message = format!(
            "TRUE, FALSE and NULL must be lowercase; expected \"{}\" but found \"{}\"",
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
    fn test_constants() {
        let diagnostics = check(LowerCaseConstantSniff, "<?php\n$a = TRUE;\n$b = False ?? null;\n");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_fix() {
        let report = fix(LowerCaseConstantSniff, "<?php\nfunction f($x = NULL) { return FALSE; }\n");
        assert_eq!(report.source, "<?php\nfunction f($x = null) { return false; }\n");
    }

    #[test]
    fn test_class_constants_untouched() {
        let source = "<?php\nclass A { const TRUE = 1; }\necho A::NULL;\n";
        assert!(check(LowerCaseConstantSniff, source).is_empty());
    }
}
