//! Block matcher: finds the longest run of tokens two windows share.
//!
//! Every run of `block_size` consecutive tokens in the new window is indexed
//! by its normalized content. The old window is then swept left to right
//! while tracking, for each candidate end position in the new window, how
//! many consecutive blocks have matched so far. The longest run wins; among
//! equally long runs the first one found is kept.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::Range;

use serde::Serialize;

use redline_tokenizer::{is_whitespace, strip_any_attributes, Token};

/// A run of tokens that is equal in both documents:
/// `old[start_in_old..end_in_old()]` matches `new[start_in_new..end_in_new()]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Match {
    pub start_in_old: usize,
    pub start_in_new: usize,
    pub size: usize,
}

impl Match {
    pub fn new(start_in_old: usize, start_in_new: usize, size: usize) -> Self {
        Self {
            start_in_old,
            start_in_new,
            size,
        }
    }

    pub fn end_in_old(&self) -> usize {
        self.start_in_old + self.size
    }

    pub fn end_in_new(&self) -> usize {
        self.start_in_new + self.size
    }

    pub fn old_range(&self) -> Range<usize> {
        self.start_in_old..self.end_in_old()
    }

    pub fn new_range(&self) -> Range<usize> {
        self.start_in_new..self.end_in_new()
    }
}

/// Options that shape how tokens are compared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOptions {
    /// Carried for configuration compatibility; matching ignores it.
    pub repeating_words_accuracy: f64,
    /// Compare all whitespace tokens as a single space.
    pub ignore_whitespace_differences: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            repeating_words_accuracy: 1.0,
            ignore_whitespace_differences: false,
        }
    }
}

/// The comparison key of a token: tags lose their attributes, and whitespace
/// collapses to `" "` when whitespace differences are ignored.
pub fn normalize_for_index(token: &str, ignore_whitespace_differences: bool) -> Cow<'_, str> {
    let stripped = strip_any_attributes(token);
    if ignore_whitespace_differences && is_whitespace(&stripped) {
        Cow::Borrowed(" ")
    } else {
        stripped
    }
}

/// Finds best matches between windows of two token sequences.
///
/// Both sequences are normalized once up front; every window query reuses
/// them.
#[derive(Debug)]
pub struct BlockMatcher<'a> {
    old: Vec<Cow<'a, str>>,
    new: Vec<Cow<'a, str>>,
}

impl<'a> BlockMatcher<'a> {
    pub fn new(old_words: &[Token<'a>], new_words: &[Token<'a>], options: MatchOptions) -> Self {
        let normalize = |words: &[Token<'a>]| {
            words
                .iter()
                .map(|&word| normalize_for_index(word, options.ignore_whitespace_differences))
                .collect()
        };
        Self {
            old: normalize(old_words),
            new: normalize(new_words),
        }
    }

    /// Number of tokens in the old sequence.
    pub fn old_len(&self) -> usize {
        self.old.len()
    }

    /// Number of tokens in the new sequence.
    pub fn new_len(&self) -> usize {
        self.new.len()
    }

    /// Find the longest run shared by `old[old_window]` and `new[new_window]`,
    /// indexing blocks of `block_size` tokens.
    ///
    /// Returns `None` when either window is shorter than one block or no
    /// block of the old window occurs in the new window.
    pub fn find_match(
        &self,
        old_window: Range<usize>,
        new_window: Range<usize>,
        block_size: usize,
    ) -> Option<Match> {
        debug_assert!(old_window.end <= self.old.len() && new_window.end <= self.new.len());
        if block_size == 0 || old_window.is_empty() || new_window.is_empty() {
            return None;
        }

        let index = self.index_new_blocks(new_window.clone(), block_size);
        if index.is_empty() {
            return None;
        }

        let mut best = Match::new(old_window.start, new_window.start, 0);
        // end position of a matching block in new -> consecutive blocks matched
        let mut run_at: HashMap<usize, usize> = HashMap::new();

        for (offset, block) in self.old[old_window.clone()].windows(block_size).enumerate() {
            let end_in_old = old_window.start + offset + block_size - 1;
            let Some(ends_in_new) = index.get(block) else {
                run_at.clear();
                continue;
            };

            let mut next_run_at = HashMap::with_capacity(ends_in_new.len());
            for &end_in_new in ends_in_new {
                let run = end_in_new
                    .checked_sub(1)
                    .and_then(|prev| run_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_at.insert(end_in_new, run);

                if run > best.size {
                    best = Match::new(
                        end_in_old + 2 - run - block_size,
                        end_in_new + 2 - run - block_size,
                        run,
                    );
                }
            }
            run_at = next_run_at;
        }

        (best.size > 0).then(|| Match::new(best.start_in_old, best.start_in_new, best.size + block_size - 1))
    }

    /// Try [`find_match`](Self::find_match) with block sizes `granularity`,
    /// `granularity - 1`, …, `1` and return the first hit.
    pub fn find_match_by_granularity(
        &self,
        old_window: Range<usize>,
        new_window: Range<usize>,
        granularity: usize,
    ) -> Option<Match> {
        (1..=granularity)
            .rev()
            .find_map(|block_size| self.find_match(old_window.clone(), new_window.clone(), block_size))
    }

    /// Block content -> end positions (in new) of every block with that content.
    fn index_new_blocks(
        &self,
        new_window: Range<usize>,
        block_size: usize,
    ) -> HashMap<&[Cow<'a, str>], Vec<usize>> {
        let mut index: HashMap<&[Cow<'a, str>], Vec<usize>> = HashMap::new();
        for (offset, block) in self.new[new_window.clone()].windows(block_size).enumerate() {
            index
                .entry(block)
                .or_default()
                .push(new_window.start + offset + block_size - 1);
        }
        index
    }
}

/// Find the best match between `old_words[old_window]` and
/// `new_words[new_window]` at a fixed block size.
pub fn find_best_match(
    old_words: &[Token<'_>],
    new_words: &[Token<'_>],
    old_window: Range<usize>,
    new_window: Range<usize>,
    block_size: usize,
    options: MatchOptions,
) -> Option<Match> {
    BlockMatcher::new(old_words, new_words, options).find_match(old_window, new_window, block_size)
}
