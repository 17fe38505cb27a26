//! phpsniff-core: Token model for PHP source analysis
//!
//! This crate provides:
//! - `tokenize()`: Lossless tokenizer, concatenated token text equals the input
//! - `index()`: Bracket, scope, condition and doc comment linking
//! - `TokenStream`: An indexed token sequence with navigation queries
//! - `helpers`: Namespace, doc block and enclosing class lookups

pub mod helpers;
mod indexer;
mod navigator;
mod stream;
mod token;
mod tokenizer;

pub use indexer::index;
pub use stream::{detect_eol, Scope, TokenStream};
pub use token::{
    keyword, Token, TokenKind, COMMENT_TOKENS, EMPTY_TOKENS, OO_SCOPE_OWNERS, SCOPE_OWNERS,
    STATEMENT_END,
};
pub use tokenizer::{tokenize, Tokenizer};
