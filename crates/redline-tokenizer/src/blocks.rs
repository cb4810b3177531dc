//! Block expressions: caller-supplied patterns whose matches are kept whole.
//!
//! A block expression protects spans such as templating placeholders
//! (`{{ user.name }}`) from being split into words. Every match becomes a
//! single opaque token, whatever characters it contains.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{TokenizeError, TokenizeResult};

/// A compiled set of block expressions.
#[derive(Clone, Debug, Default)]
pub struct BlockExpressions {
    patterns: Vec<Regex>,
}

impl BlockExpressions {
    /// An empty set: no span is protected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile each pattern. Fails on the first pattern that does not compile.
    pub fn compile<I, S>(patterns: I) -> TokenizeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| TokenizeError::InvalidBlockExpression {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<TokenizeResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Wrap already compiled expressions.
    pub fn from_regexes(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Returns `true` if no expression is configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of configured expressions.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Find every protected span in `text`, keyed by start byte offset with
    /// the exclusive end offset as value.
    ///
    /// Empty matches are ignored. Any two spans that share a byte are an
    /// error, whether they come from one expression or from two.
    pub(crate) fn locate(&self, text: &str) -> TokenizeResult<BTreeMap<usize, usize>> {
        let mut spans: Vec<(usize, usize, &Regex)> = self
            .patterns
            .iter()
            .flat_map(|re| {
                re.find_iter(text)
                    .filter(|m| !m.is_empty())
                    .map(move |m| (m.start(), m.end(), re))
            })
            .collect();
        spans.sort_by_key(|&(start, end, _)| (start, end));

        let mut located = BTreeMap::new();
        let mut covered_until = 0;
        for (start, end, re) in spans {
            if start < covered_until {
                return Err(TokenizeError::OverlappingBlocks {
                    pattern: re.as_str().to_string(),
                    start,
                    end,
                });
            }
            covered_until = end;
            located.insert(start, end);
        }
        Ok(located)
    }
}
