//! Error types for the tokenizer crate.

/// Errors that can occur while preparing or running the tokenizer.
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    /// A block expression could not be compiled.
    #[error("invalid block expression `{pattern}`: {source}")]
    InvalidBlockExpression {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Two block expression matches claim overlapping spans of the input.
    #[error("block expression `{pattern}` matches {start}..{end}, overlapping another block")]
    OverlappingBlocks {
        pattern: String,
        start: usize,
        end: usize,
    },
}

/// Convenience alias for tokenizer results.
pub type TokenizeResult<T> = Result<T, TokenizeError>;
