//! The four-mode scanner that cuts a document into tokens.
//!
//! The scanner walks the input one character at a time. Its mode says what
//! kind of token is pending: plain characters, a tag, a whitespace run or an
//! entity. Every token is a slice of the input, so the tokens of a document
//! always concatenate back to it.

use tracing::debug;

use crate::blocks::BlockExpressions;
use crate::error::TokenizeResult;
use crate::token::{is_whitespace, is_word_char, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Character,
    Tag,
    Whitespace,
    Entity,
}

/// Scanner state: the pending token is `text[start..pos]`.
struct Scanner<'a> {
    text: &'a str,
    mode: Mode,
    start: usize,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            mode: Mode::Character,
            start: 0,
            tokens: Vec::new(),
        }
    }

    /// Emit the pending token, if any, ending at `end`.
    fn flush(&mut self, end: usize) {
        if end > self.start {
            self.tokens.push(&self.text[self.start..end]);
        }
        self.start = end;
    }

    /// Emit the pending token and start a new one at `at`.
    fn restart(&mut self, at: usize, mode: Mode) {
        self.flush(at);
        self.mode = mode;
    }

    fn pending_ends_in_word(&self, pos: usize) -> bool {
        self.text[self.start..pos]
            .chars()
            .next_back()
            .map_or(true, is_word_char)
    }

    fn step(&mut self, pos: usize, c: char) {
        match self.mode {
            Mode::Character => match c {
                '<' => self.restart(pos, Mode::Tag),
                '&' => self.restart(pos, Mode::Entity),
                c if c.is_whitespace() => self.restart(pos, Mode::Whitespace),
                c if is_word_char(c) && self.pending_ends_in_word(pos) => {}
                _ => self.restart(pos, Mode::Character),
            },
            Mode::Tag => {
                if c == '>' {
                    self.flush(pos + c.len_utf8());
                    self.mode = Mode::Character;
                }
            }
            Mode::Whitespace => match c {
                '<' => self.restart(pos, Mode::Tag),
                '&' => self.restart(pos, Mode::Entity),
                c if c.is_whitespace() => {}
                _ => self.restart(pos, Mode::Character),
            },
            Mode::Entity => match c {
                '<' => self.restart(pos, Mode::Tag),
                c if c.is_whitespace() => self.restart(pos, Mode::Whitespace),
                ';' => self.close_entity(pos + c.len_utf8()),
                c if is_word_char(c) => {}
                _ => self.restart(pos, Mode::Character),
            },
        }
    }

    /// Emit the entity ending at `end`.
    ///
    /// A whitespace entity that directly follows a whitespace token is joined
    /// with it and the combined run stays pending, so `" &nbsp; "` ends up as
    /// one whitespace token. The join needs at least one token before the
    /// pair.
    fn close_entity(&mut self, end: usize) {
        self.flush(end);
        self.mode = Mode::Character;

        let n = self.tokens.len();
        if n > 2 && is_whitespace(self.tokens[n - 2]) && is_whitespace(self.tokens[n - 1]) {
            let joined = self.tokens[n - 2].len() + self.tokens[n - 1].len();
            self.tokens.truncate(n - 2);
            self.start = end - joined;
            self.mode = Mode::Whitespace;
        }
    }

    fn finish(mut self) -> Vec<Token<'a>> {
        self.flush(self.text.len());
        self.tokens
    }
}

/// Splits documents into tokens, keeping block expression matches whole.
#[derive(Clone, Debug, Default)]
pub struct Tokenizer {
    blocks: BlockExpressions,
}

impl Tokenizer {
    /// A tokenizer without block expressions.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tokenizer that emits every match of `blocks` as a single token.
    pub fn with_blocks(blocks: BlockExpressions) -> Self {
        Self { blocks }
    }

    /// The configured block expressions.
    pub fn blocks(&self) -> &BlockExpressions {
        &self.blocks
    }

    /// Tokenize `text`.
    ///
    /// Fails only if block expression matches overlap; nothing is tokenized
    /// in that case.
    pub fn tokenize<'a>(&self, text: &'a str) -> TokenizeResult<Vec<Token<'a>>> {
        let blocks = self.blocks.locate(text)?;
        let mut scanner = Scanner::new(text);
        let mut block_end: Option<usize> = None;

        for (pos, c) in text.char_indices() {
            if block_end == Some(pos) {
                scanner.flush(pos);
                block_end = None;
            }
            if let Some(&end) = blocks.get(&pos) {
                scanner.flush(pos);
                block_end = Some(end);
            }
            if block_end.is_some() {
                scanner.mode = Mode::Character;
                continue;
            }
            scanner.step(pos, c);
        }

        let tokens = scanner.finish();
        debug!(bytes = text.len(), tokens = tokens.len(), blocks = blocks.len(), "tokenized document");
        Ok(tokens)
    }
}

/// Tokenize `text` without block expressions. This cannot fail.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut scanner = Scanner::new(text);
    for (pos, c) in text.char_indices() {
        scanner.step(pos, c);
    }
    scanner.finish()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Tokenizing never loses or reorders input.
        #[test]
        fn tokens_concatenate_to_input(text in "\\PC{0,64}") {
            prop_assert_eq!(tokenize(&text).concat(), text);
        }

        /// Markup-heavy input round-trips as well.
        #[test]
        fn markup_tokens_concatenate_to_input(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("<b>"), Just("</b>"), Just("&nbsp;"), Just("&amp"), Just(";"),
                    Just(" "), Just("\n"), Just("word"), Just("中"), Just("<"), Just(">"),
                    Just("&"), Just("'"),
                ],
                0..32,
            )
        ) {
            let text = parts.concat();
            let tokens = tokenize(&text);
            prop_assert!(tokens.iter().all(|t| !t.is_empty()));
            prop_assert_eq!(tokens.concat(), text);
        }
    }
}
