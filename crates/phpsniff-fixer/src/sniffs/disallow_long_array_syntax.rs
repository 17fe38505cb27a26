//! `array(...)` to `[...]`

use phpsniff_core::TokenKind;

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

/// Short array syntax must be used
pub struct DisallowLongArraySyntaxSniff;

impl Sniff for DisallowLongArraySyntaxSniff {
    fn code(&self) -> &'static str {
        "Generic.Arrays.DisallowLongArraySyntax"
    }

    fn description(&self) -> &'static str {
        "Short array syntax must be used to define arrays"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![TokenKind::Array]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();

        // `array` as a type declaration is not followed by `(`
        let Some(opener) = stream.find_next_non_empty(ptr + 1) else {
            return Ok(());
        };
        if stream[opener].kind != TokenKind::OpenParenthesis {
            return Ok(());
        }

        let message = "Short array syntax must be used to define arrays";
        let Some(closer) = stream[opener].partner else {
            file.add_error(message, ptr, "Found");
            return Ok(());
        };

        if file.add_fixable_error(message, ptr, "Found") {
            let fixer = file.fixer();
            fixer.begin_changeset();
            for i in ptr..opener {
                fixer.replace(i, "")?;
            }
            fixer.replace(opener, "[")?;
            fixer.replace(closer, "]")?;
            fixer.end_changeset()?;
        }
        Ok(())
    }
}
