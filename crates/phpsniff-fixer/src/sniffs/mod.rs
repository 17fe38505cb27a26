//! Bundled sniffs
//!
//! A small standard that exercises the engine end to end: single-token
//! replacements, multi-token changesets, scope links, conditions and doc
//! comment tag groups.

mod disallow_long_array_syntax;
mod doc_comment_alias_tag;
mod empty_body;
mod lower_case_constant;
mod lower_case_keyword;
mod self_member_reference;
mod trailing_whitespace;

pub use disallow_long_array_syntax::DisallowLongArraySyntaxSniff;
pub use doc_comment_alias_tag::DocCommentAliasTagSniff;
pub use empty_body::EmptyBodySniff;
pub use lower_case_constant::LowerCaseConstantSniff;
pub use lower_case_keyword::LowerCaseKeywordSniff;
pub use self_member_reference::SelfMemberReferenceSniff;
pub use trailing_whitespace::TrailingWhitespaceSniff;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::sync::Arc;

    use crate::config::EngineConfig;
    use crate::diagnostic::Diagnostic;
    use crate::ruleset::Ruleset;
    use crate::runner::{run_file, FileReport};
    use crate::sniff::Sniff;

    fn ruleset(sniff: impl Sniff + 'static) -> Ruleset {
        let mut ruleset = Ruleset::new();
        ruleset.register(Arc::new(sniff));
        ruleset
    }

    /// Diagnostics of a report-only run
    pub fn check(sniff: impl Sniff + 'static, source: &str) -> Vec<Diagnostic> {
        let config = EngineConfig::default();
        run_file(Path::new("test.php"), source, &ruleset(sniff), &config).diagnostics
    }

    /// Full report of a fixing run
    pub fn fix(sniff: impl Sniff + 'static, source: &str) -> FileReport {
        let config = EngineConfig {
            fix: true,
            ..Default::default()
        };
        run_file(Path::new("test.php"), source, &ruleset(sniff), &config)
    }
}
