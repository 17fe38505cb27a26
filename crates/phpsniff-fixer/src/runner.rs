//! The round loop
//!
//! Each round rebuilds the token stream from the current text, runs every
//! sniff over it and joins the committed fixes into the next text. Nothing
//! from one round is reused by the next except the file context.

use std::path::Path;

use phpsniff_core::TokenStream;

use crate::config::EngineConfig;
use crate::context::FileContext;
use crate::diagnostic::{Diagnostic, INVALID_INDEX_CODE};
use crate::file::SniffFile;
use crate::fixer::Fixer;
use crate::logging;
use crate::ruleset::Ruleset;

/// How a file's run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A round made no commits
    Converged,
    /// Every fixing round committed something; the diagnostics come from a
    /// final report-only pass
    RoundCapReached,
}

/// Result of running the engine over one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub outcome: Outcome,
    /// Diagnostics of the last round, the ones still present in `source`
    pub diagnostics: Vec<Diagnostic>,
    /// Text after all committed fixes
    pub source: String,
    /// Changesets committed over all rounds
    pub fixed: usize,
    /// Rounds run, including a final report-only pass
    pub rounds: usize,
}

impl FileReport {
    pub fn is_changed(&self) -> bool {
        self.fixed > 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }
}

/// Drives sniffs over files
pub struct Runner<'r> {
    ruleset: &'r Ruleset,
    config: &'r EngineConfig,
}

impl<'r> Runner<'r> {
    pub fn new(ruleset: &'r Ruleset, config: &'r EngineConfig) -> Self {
        Self { ruleset, config }
    }

    /// Check, and in fix mode rewrite, one file's source
    pub fn run(&self, path: &Path, source: &str) -> FileReport {
        let mut context = FileContext::new(path);

        if !self.config.fix {
            let (diagnostics, _) = self.round(path, source, &mut context, 1, false);
            return self.report(path, Outcome::Converged, diagnostics, source.to_string(), 0, 1);
        }

        let max_rounds = self.config.max_rounds.max(1);
        let mut current = source.to_string();
        let mut fixed = 0;

        for round in 1..=max_rounds {
            let (diagnostics, fixer) = self.round(path, &current, &mut context, round, true);
            let commits = fixer.commit_count();
            if commits == 0 {
                return self.report(path, Outcome::Converged, diagnostics, current, fixed, round);
            }
            fixed += commits;
            current = fixer.contents();
        }

        let (diagnostics, _) = self.round(path, &current, &mut context, max_rounds + 1, false);
        self.report(path, Outcome::RoundCapReached, diagnostics, current, fixed, max_rounds + 1)
    }

    fn round(
        &self,
        path: &Path,
        source: &str,
        context: &mut FileContext,
        round: usize,
        fixing: bool,
    ) -> (Vec<Diagnostic>, Fixer) {
        let stream = TokenStream::parse(source);
        if round == 1 {
            logging::log_file_start(path, stream.len(), self.config.fix);
        }
        logging::log_round_start(path, round, fixing);

        let mut file = SniffFile::new(&stream, context, self.config, fixing);
        for (ptr, token) in stream.iter().enumerate() {
            for sniff in self.ruleset.for_kind(token.kind) {
                file.set_current_sniff(sniff.code());
                let result = sniff.process(&mut file, ptr);

                if let Err(error) = result {
                    file.fixer().rollback_changeset();
                    logging::log_contract_violation(path, sniff.code(), ptr, &error.to_string());
                    file.add_internal(
                        format!("{} staged an invalid edit: {}", sniff.code(), error),
                        ptr,
                        INVALID_INDEX_CODE,
                    );
                } else if file.fixer().in_changeset() {
                    file.fixer().rollback_changeset();
                    if logging::is_enabled() {
                        logging::log(&format!(
                            "{} left a changeset open at token {}; discarded",
                            sniff.code(),
                            ptr
                        ));
                    }
                }
            }
        }

        let (diagnostics, fixer) = file.finish();
        logging::log_round_end(path, round, fixer.commit_count(), fixer.rejected_count());
        (diagnostics, fixer)
    }

    fn report(
        &self,
        path: &Path,
        outcome: Outcome,
        diagnostics: Vec<Diagnostic>,
        source: String,
        fixed: usize,
        rounds: usize,
    ) -> FileReport {
        let label = match outcome {
            Outcome::Converged => "converged",
            Outcome::RoundCapReached => "round cap reached",
        };
        logging::log_outcome(path, label, rounds, fixed, diagnostics.len());

        FileReport {
            outcome,
            diagnostics,
            source,
            fixed,
            rounds,
        }
    }
}

/// Run `ruleset` over `source` with `config`
pub fn run_file(path: &Path, source: &str, ruleset: &Ruleset, config: &EngineConfig) -> FileReport {
    Runner::new(ruleset, config).run(path, source)
}
