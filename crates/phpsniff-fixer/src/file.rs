//! The handle a sniff receives for the file being checked

use std::any::Any;
use std::path::Path;

use phpsniff_core::TokenStream;

use crate::config::EngineConfig;
use crate::context::FileContext;
use crate::diagnostic::{Diagnostic, Severity};
use crate::fixer::Fixer;

/// One round of one file, as seen by sniffs
///
/// The token stream is borrowed for the whole round, so `stream()` can be
/// held while the fixer is used.
pub struct SniffFile<'a> {
    stream: &'a TokenStream,
    fixer: Fixer,
    context: &'a mut FileContext,
    config: &'a EngineConfig,
    diagnostics: Vec<Diagnostic>,
    current_sniff: &'static str,
}

impl<'a> SniffFile<'a> {
    pub fn new(
        stream: &'a TokenStream,
        context: &'a mut FileContext,
        config: &'a EngineConfig,
        fixing: bool,
    ) -> Self {
        Self {
            stream,
            fixer: Fixer::new(stream, config.collision, fixing),
            context,
            config,
            diagnostics: Vec::new(),
            current_sniff: "",
        }
    }

    pub fn path(&self) -> &Path {
        self.context.path()
    }

    pub fn stream(&self) -> &'a TokenStream {
        self.stream
    }

    pub fn fixer(&mut self) -> &mut Fixer {
        &mut self.fixer
    }

    /// Whether fixable reports in this round may stage fixes
    pub fn is_fixing(&self) -> bool {
        self.fixer.is_enabled()
    }

    /// Memoized per-file value of type `T`
    ///
    /// `init` runs once per file, with the stream of the round that first
    /// asks for it.
    pub fn memo<T, F>(&mut self, init: F) -> &mut T
    where
        T: Any + Send,
        F: FnOnce(&TokenStream, &Path) -> T,
    {
        let stream = self.stream;
        let path = self.context.path().to_path_buf();
        self.context.get_or_insert_with(|| init(stream, &path))
    }

    pub fn add_error(&mut self, message: impl Into<String>, ptr: usize, code: &str) {
        self.report(Severity::Error, message.into(), ptr, code, false);
    }

    pub fn add_warning(&mut self, message: impl Into<String>, ptr: usize, code: &str) {
        self.report(Severity::Warning, message.into(), ptr, code, false);
    }

    /// Report a fixable error; stage the fix only when this returns true
    pub fn add_fixable_error(&mut self, message: impl Into<String>, ptr: usize, code: &str) -> bool {
        self.report(Severity::Error, message.into(), ptr, code, true);
        self.is_fixing()
    }

    /// Report a fixable warning; stage the fix only when this returns true
    pub fn add_fixable_warning(&mut self, message: impl Into<String>, ptr: usize, code: &str) -> bool {
        self.report(Severity::Warning, message.into(), ptr, code, true);
        self.is_fixing()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn set_current_sniff(&mut self, code: &'static str) {
        self.current_sniff = code;
    }

    /// Record a diagnostic under an absolute code, bypassing the sniff prefix
    pub(crate) fn add_internal(&mut self, message: String, ptr: usize, code: &str) {
        let (line, column) = self.position(ptr);
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            code: code.to_string(),
            message,
            line,
            column,
            fixable: false,
        });
    }

    pub(crate) fn finish(self) -> (Vec<Diagnostic>, Fixer) {
        (self.diagnostics, self.fixer)
    }

    fn report(&mut self, severity: Severity, message: String, ptr: usize, code: &str, fixable: bool) {
        let code = if self.current_sniff.is_empty() {
            code.to_string()
        } else {
            format!("{}.{}", self.current_sniff, code)
        };
        if self.config.is_silent(&code) {
            return;
        }

        let (line, column) = self.position(ptr);
        self.diagnostics.push(Diagnostic {
            severity,
            code,
            message,
            line,
            column,
            fixable,
        });
    }

    /// Line and column of `ptr`, falling back to the last token
    fn position(&self, ptr: usize) -> (usize, usize) {
        self.stream
            .get(ptr)
            .or_else(|| self.stream.as_slice().last())
            .map_or((1, 1), |t| (t.line, t.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_prefixes_sniff_code() {
        let stream = TokenStream::parse("<?php\n$a = 1;");
        let mut context = FileContext::new("a.php");
        let config = EngineConfig::default();
        let mut file = SniffFile::new(&stream, &mut context, &config, false);

        file.set_current_sniff("Test.Demo.Sniff");
        file.add_warning("careful", 1, "Careful");
        assert!(!file.add_fixable_error("broken", 1, "Broken"));

        let diagnostics = file.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].code, "Test.Demo.Sniff.Careful");
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!((diagnostics[0].line, diagnostics[0].column), (2, 1));
        assert!(diagnostics[1].fixable);
    }

    #[test]
    fn test_silent_code_still_fixes() {
        let stream = TokenStream::parse("<?php $a;");
        let mut context = FileContext::new("a.php");
        let config = EngineConfig {
            fix: true,
            silent: ["Test.Demo".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let mut file = SniffFile::new(&stream, &mut context, &config, true);
        file.set_current_sniff("Test.Demo.Sniff");

        assert!(file.add_fixable_error("hidden", 1, "Found"));
        assert!(file.diagnostics().is_empty());
    }

    #[test]
    fn test_stream_outlives_fixer_borrow() {
        let stream = TokenStream::parse("<?php $a; $b;");
        let mut context = FileContext::new("a.php");
        let config = EngineConfig::default();
        let mut file = SniffFile::new(&stream, &mut context, &config, true);

        let tokens = file.stream();
        for (i, token) in tokens.iter().enumerate() {
            if token.text.starts_with('$') {
                file.fixer().insert_before(i, "@").unwrap();
            }
        }

        let (_, fixer) = file.finish();
        assert_eq!(fixer.contents(), "<?php @$a; @$b;");
    }

    #[test]
    fn test_memo_sees_path() {
        let stream = TokenStream::parse("<?php");
        let mut context = FileContext::new("tests/FooTest.php");
        let config = EngineConfig::default();
        let mut file = SniffFile::new(&stream, &mut context, &config, false);

        let is_test = *file.memo(|_, path| path.to_string_lossy().ends_with("Test.php"));
        assert!(is_test);
    }
}
