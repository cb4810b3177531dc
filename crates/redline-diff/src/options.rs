use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::matcher::MatchOptions;

/// Configuration for an HTML diff.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Accepted and validated but has no effect on matching yet.
    pub repeating_words_accuracy: f64,
    /// Treat every whitespace variant (including `&nbsp;`) as one space while
    /// matching. Unchanged text is still rendered with its own whitespace.
    pub ignore_whitespace_differences: bool,
    /// Drop matches whose character length does not exceed this fraction of
    /// the unmatched text around them. `0.0` keeps every match.
    pub orphan_match_threshold: f64,
    /// Number of tokens per indexed block on the first matching attempt.
    /// Clamped to the length of the shorter document.
    pub match_granularity: usize,
    /// Merge runs of replacements separated only by whitespace or tiny
    /// matches into one replacement.
    pub combine_words: bool,
    /// Regular expressions whose matches are kept as single tokens.
    pub block_expressions: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            repeating_words_accuracy: 1.0,
            ignore_whitespace_differences: false,
            orphan_match_threshold: 0.0,
            match_granularity: 4,
            combine_words: false,
            block_expressions: Vec::new(),
        }
    }
}

impl DiffOptions {
    /// Check that every numeric option is in range.
    pub fn validate(&self) -> DiffResult<()> {
        non_negative("repeating_words_accuracy", self.repeating_words_accuracy)?;
        non_negative("orphan_match_threshold", self.orphan_match_threshold)?;
        if self.match_granularity == 0 {
            return Err(DiffError::InvalidOption {
                name: "match_granularity",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The subset of options the block matcher needs.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            repeating_words_accuracy: self.repeating_words_accuracy,
            ignore_whitespace_differences: self.ignore_whitespace_differences,
        }
    }
}

fn non_negative(name: &'static str, value: f64) -> DiffResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DiffError::InvalidOption {
            name,
            reason: format!("must be a finite number >= 0, got {value}"),
        })
    }
}
