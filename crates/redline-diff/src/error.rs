//! Error types for the diff crate.

use redline_tokenizer::TokenizeError;

/// Errors that can occur while configuring or running a diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Tokenizing one of the documents failed (bad or overlapping block
    /// expressions).
    #[error("tokenizer error: {0}")]
    Tokenize(#[from] TokenizeError),

    /// An option value is out of range.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
