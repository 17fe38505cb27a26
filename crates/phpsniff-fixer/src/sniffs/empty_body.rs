//! Empty declaration bodies collapse to `{}`

use phpsniff_core::{Scope, TokenKind};

use crate::file::SniffFile;
use crate::fixer::FixerError;
use crate::sniff::Sniff;

pub struct EmptyBodySniff;

impl Sniff for EmptyBodySniff {
    fn code(&self) -> &'static str {
        "Generic.Formatting.EmptyBody"
    }

    fn description(&self) -> &'static str {
        "Empty class and function bodies must be written as {}"
    }

    fn register(&self) -> Vec<TokenKind> {
        vec![
            TokenKind::Class,
            TokenKind::Interface,
            TokenKind::Trait,
            TokenKind::Enum,
            TokenKind::Function,
        ]
    }

    fn process(&self, file: &mut SniffFile<'_>, ptr: usize) -> Result<(), FixerError> {
        let stream = file.stream();

        // Abstract and interface methods have no body at all
        let Scope::Empty { opener, closer } = stream.scope(ptr) else {
            return Ok(());
        };
        if closer == opener + 1 {
            return Ok(());
        }

        if file.add_fixable_warning("Empty body should be written as {}", opener, "Found") {
            let fixer = file.fixer();
            fixer.begin_changeset();
            for i in opener + 1..closer {
                fixer.replace(i, "")?;
            }
            fixer.end_changeset()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffs::test_support::{check, fix};

    #[test]
    fn test_collapsed_bodies_are_clean() {
        let source = "<?php\nclass A {}\nfunction f() {}\n";
        assert!(check(EmptyBodySniff, source).is_empty());
    }

    #[test]
    fn test_fix_multiline_bodies() {
        let source = "<?php\nclass A {\n\n}\nfunction f()\n{\n    \n}\n";
        let report = fix(EmptyBodySniff, source);
        assert_eq!(report.source, "<?php\nclass A {}\nfunction f()\n{}\n");
        assert_eq!(report.fixed, 2);
    }

    #[test]
    fn test_bodies_with_content_or_comments_kept() {
        let source = "<?php\nclass A {\n    // nothing yet\n}\nfunction f() {\n    return 1;\n}\n";
        assert!(check(EmptyBodySniff, source).is_empty());
    }

    #[test]
    fn test_declarations_without_body_skipped() {
        let source = "<?php\ninterface I {\n    function f();\n}\nabstract class A {\n    abstract function g();\n}\n";
        assert!(check(EmptyBodySniff, source).is_empty());
    }

    #[test]
    fn test_closure_body() {
        let report = fix(EmptyBodySniff, "<?php\n$f = function () {\n};\n");
        assert_eq!(report.source, "<?php\n$f = function () {};\n");
    }
}
