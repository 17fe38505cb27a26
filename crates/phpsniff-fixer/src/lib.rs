//! phpsniff-fixer: Sniff host and multi-round fixer
//!
//! This crate provides:
//! - `Fixer`: Transactional changesets over one round's tokens
//! - `Sniff`: The contract every check implements
//! - `SniffFile`: The per-round handle sniffs report and fix through
//! - `Ruleset`: Sniff registry with a token kind dispatch table
//! - `Runner`: The round loop, fixing to a fixed point or the round cap
//!
//! # Example
//!
//! ```ignore
//! use phpsniff_fixer::{run_file, EngineConfig, Ruleset};
//!
//! let config = EngineConfig { fix: true, ..Default::default() };
//! let report = run_file(Path::new("a.php"), source, &Ruleset::standard(), &config);
//! println!("{}", report.source);
//! ```

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod file;
pub mod fixer;
pub mod logging;
pub mod ruleset;
pub mod runner;
pub mod sniff;
pub mod sniffs;

pub use config::{ConfigError, EngineConfig, DEFAULT_MAX_ROUNDS};
pub use context::FileContext;
pub use diagnostic::{Diagnostic, Severity, INVALID_INDEX_CODE};
pub use file::SniffFile;
pub use fixer::{CollisionPolicy, Fixer, FixerError};
pub use ruleset::{Ruleset, SniffInfo};
pub use runner::{run_file, FileReport, Outcome, Runner};
pub use sniff::Sniff;
