use tracing::debug;

use redline_tokenizer::{BlockExpressions, Tokenizer};

use crate::alignment::{align, Operation};
use crate::error::DiffResult;
use crate::options::DiffOptions;
use crate::render::render;

/// A configured differ. Options are validated and block expressions compiled
/// once, then any number of document pairs can be diffed.
#[derive(Clone, Debug)]
pub struct HtmlDiff {
    options: DiffOptions,
    tokenizer: Tokenizer,
}

impl HtmlDiff {
    /// Validate `options` and compile their block expressions.
    pub fn new(options: DiffOptions) -> DiffResult<Self> {
        options.validate()?;
        let blocks = BlockExpressions::compile(&options.block_expressions)?;
        debug!(
            block_expressions = blocks.len(),
            granularity = options.match_granularity,
            "configured differ"
        );
        Ok(Self {
            options,
            tokenizer: Tokenizer::with_blocks(blocks),
        })
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Render `new` with the changes from `old` marked up.
    ///
    /// Identical inputs are returned unchanged without being tokenized.
    pub fn diff(&self, old: &str, new: &str) -> DiffResult<String> {
        if old == new {
            debug!(bytes = new.len(), "identical documents, skipping diff");
            return Ok(new.to_string());
        }
        let old_words = self.tokenizer.tokenize(old)?;
        let new_words = self.tokenizer.tokenize(new)?;
        let operations = align(&old_words, &new_words, &self.options);
        Ok(render(&operations, &old_words, &new_words))
    }

    /// The aligned regions of the two documents, without rendering.
    ///
    /// Ranges index the token sequences produced by this differ's tokenizer.
    pub fn operations(&self, old: &str, new: &str) -> DiffResult<Vec<Operation>> {
        let old_words = self.tokenizer.tokenize(old)?;
        let new_words = self.tokenizer.tokenize(new)?;
        Ok(align(&old_words, &new_words, &self.options))
    }

    /// The tokenizer this differ uses.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

impl Default for HtmlDiff {
    fn default() -> Self {
        Self {
            options: DiffOptions::default(),
            tokenizer: Tokenizer::new(),
        }
    }
}

/// Diff two documents with `options`.
pub fn diff(old: &str, new: &str, options: &DiffOptions) -> DiffResult<String> {
    HtmlDiff::new(options.clone())?.diff(old, new)
}
