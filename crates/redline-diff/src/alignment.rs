//! Alignment engine: turns best matches into a gap-free list of operations.
//!
//! The best match of the whole window splits it into a part before and a
//! part after the match, each aligned the same way. The resulting matches
//! are ordered and disjoint in both documents. The gaps between them become
//! insert, delete or replace operations.
//!
//! # Invariants
//!
//! - Old-side ranges of the returned operations concatenate to
//!   `0..old.len()`, new-side ranges to `0..new.len()`.
//! - Only `Equal` operations are backed by a match.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use redline_tokenizer::{is_whitespace, Token};

use crate::matcher::{BlockMatcher, Match};
use crate::options::DiffOptions;

/// What an operation does to its span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The span is the same in both documents.
    Equal,
    /// The new-side span was added.
    Insert,
    /// The old-side span was removed.
    Delete,
    /// The old-side span was replaced by the new-side span.
    Replace,
}

/// One aligned region: `old[start_in_old..end_in_old]` against
/// `new[start_in_new..end_in_new]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub action: Action,
    pub start_in_old: usize,
    pub end_in_old: usize,
    pub start_in_new: usize,
    pub end_in_new: usize,
}

impl Operation {
    pub fn new(action: Action, old: Range<usize>, new: Range<usize>) -> Self {
        Self {
            action,
            start_in_old: old.start,
            end_in_old: old.end,
            start_in_new: new.start,
            end_in_new: new.end,
        }
    }

    pub fn old_range(&self) -> Range<usize> {
        self.start_in_old..self.end_in_old
    }

    pub fn new_range(&self) -> Range<usize> {
        self.start_in_new..self.end_in_new
    }
}

/// Align two token sequences.
pub fn align(old: &[Token<'_>], new: &[Token<'_>], options: &DiffOptions) -> Vec<Operation> {
    let granularity = options.match_granularity.min(old.len()).min(new.len());
    let matcher = BlockMatcher::new(old, new, options.match_options());

    let mut matches = matching_blocks(&matcher, granularity);
    let found = matches.len();
    matches.push(Match::new(old.len(), new.len(), 0));

    // A zero threshold keeps every non-empty match.
    if options.orphan_match_threshold > 0.0 {
        matches = remove_orphans(matches, old, new, options.orphan_match_threshold);
    }

    let mut operations = operations_from_matches(&matches);
    if options.combine_words {
        operations = combine_operations(operations, old, new);
    }

    debug!(
        old_tokens = old.len(),
        new_tokens = new.len(),
        granularity,
        matches = found,
        orphans_removed = found + 1 - matches.len(),
        operations = operations.len(),
        "aligned documents"
    );
    operations
}

enum Step {
    Window { old: Range<usize>, new: Range<usize> },
    Emit(Match),
}

/// All matches between the two sequences, ordered left to right in both.
///
/// Divide and conquer on the best match of each window. The recursion runs
/// on an explicit stack so deeply nested splits cannot exhaust the call
/// stack.
pub fn matching_blocks(matcher: &BlockMatcher<'_>, granularity: usize) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut stack = vec![Step::Window {
        old: 0..matcher.old_len(),
        new: 0..matcher.new_len(),
    }];

    while let Some(step) = stack.pop() {
        match step {
            Step::Emit(m) => matches.push(m),
            Step::Window { old, new } => {
                if old.is_empty() || new.is_empty() {
                    continue;
                }
                let Some(m) = matcher.find_match_by_granularity(old.clone(), new.clone(), granularity)
                else {
                    continue;
                };
                // Pushed in reverse: the part before the match is handled first.
                stack.push(Step::Window {
                    old: m.end_in_old()..old.end,
                    new: m.end_in_new()..new.end,
                });
                stack.push(Step::Emit(m));
                stack.push(Step::Window {
                    old: old.start..m.start_in_old,
                    new: new.start..m.start_in_new,
                });
            }
        }
    }

    matches
}

/// Drop matches stranded between two long unmatched stretches.
///
/// A match survives if it touches its predecessor or successor in both
/// documents, or if its length in characters exceeds `threshold` times the
/// larger of the old and new distances (in characters) between its
/// predecessor and successor. The last match is always kept.
pub fn remove_orphans(
    matches: Vec<Match>,
    old: &[Token<'_>],
    new: &[Token<'_>],
    threshold: f64,
) -> Vec<Match> {
    let mut kept = Vec::with_capacity(matches.len());
    let mut iter = matches.into_iter();
    let Some(mut curr) = iter.next() else {
        return kept;
    };
    let mut prev = Match::new(0, 0, 0);

    for next in iter {
        let touches_prev =
            prev.end_in_old() == curr.start_in_old && prev.end_in_new() == curr.start_in_new;
        let touches_next =
            curr.end_in_old() == next.start_in_old && curr.end_in_new() == next.start_in_new;

        if touches_prev || touches_next {
            kept.push(curr);
        } else {
            let old_distance = char_len(&old[prev.end_in_old()..next.start_in_old]);
            let new_distance = char_len(&new[prev.end_in_new()..next.start_in_new]);
            let length = char_len(&new[curr.new_range()]);
            if length as f64 > old_distance.max(new_distance) as f64 * threshold {
                kept.push(curr);
            }
        }

        prev = curr;
        curr = next;
    }

    kept.push(curr);
    kept
}

fn char_len(tokens: &[Token<'_>]) -> usize {
    tokens.iter().map(|t| t.chars().count()).sum()
}

/// Turn ordered matches into operations covering both sequences.
fn operations_from_matches(matches: &[Match]) -> Vec<Operation> {
    let mut operations = Vec::with_capacity(matches.len() * 2);
    let (mut pos_old, mut pos_new) = (0, 0);

    for m in matches {
        debug_assert!(
            m.start_in_old >= pos_old && m.start_in_new >= pos_new,
            "match {m:?} starts before cursor ({pos_old}, {pos_new})"
        );

        let gap = match (pos_old < m.start_in_old, pos_new < m.start_in_new) {
            (true, true) => Some(Action::Replace),
            (false, true) => Some(Action::Insert),
            (true, false) => Some(Action::Delete),
            (false, false) => None,
        };
        if let Some(action) = gap {
            operations.push(Operation::new(action, pos_old..m.start_in_old, pos_new..m.start_in_new));
        }
        if m.size > 0 {
            operations.push(Operation::new(Action::Equal, m.old_range(), m.new_range()));
        }

        pos_old = m.end_in_old();
        pos_new = m.end_in_new();
    }

    operations
}

/// Merge each replacement with everything up to the next equal operation
/// that holds more than whitespace. With no such operation left, the
/// replacement runs to the end of the document.
pub fn combine_operations(
    operations: Vec<Operation>,
    old: &[Token<'_>],
    new: &[Token<'_>],
) -> Vec<Operation> {
    let Some(last) = operations.last().copied() else {
        return operations;
    };

    let mut combined = Vec::with_capacity(operations.len());
    let mut index = 0;
    while index < operations.len() {
        let op = operations[index];
        if op.action != Action::Replace {
            combined.push(op);
            index += 1;
            continue;
        }

        let anchor = operations[index + 1..]
            .iter()
            .position(|o| o.action == Action::Equal && !is_whitespace_operation(o, old, new))
            .map(|offset| index + 1 + offset);

        match anchor {
            Some(anchor) => {
                let to = operations[anchor];
                combined.push(Operation::new(
                    Action::Replace,
                    op.start_in_old..to.start_in_old,
                    op.start_in_new..to.start_in_new,
                ));
                index = anchor;
            }
            None => {
                combined.push(Operation::new(
                    Action::Replace,
                    op.start_in_old..last.end_in_old,
                    op.start_in_new..last.end_in_new,
                ));
                break;
            }
        }
    }

    combined
}

fn is_whitespace_operation(op: &Operation, old: &[Token<'_>], new: &[Token<'_>]) -> bool {
    is_whitespace(&old[op.old_range()].concat()) && is_whitespace(&new[op.new_range()].concat())
}
