//! HTML-aware tokenizer for redline.
//!
//! Cuts a document into the atomic units the diff engine aligns: words,
//! whitespace runs, entities and whole tags. Tokenization is lossless, so
//! concatenating the tokens of a document reproduces it exactly.
//!
//! # Key Types
//!
//! - [`Tokenizer`] / [`tokenize`] -- The four-mode scanner
//! - [`BlockExpressions`] -- Caller patterns whose matches stay single tokens
//! - [`Token`] -- A borrowed slice of the input; its kind is read from its text
//!   with [`is_tag`], [`is_whitespace`] and friends

pub mod blocks;
pub mod error;
pub mod scanner;
pub mod token;

pub use blocks::BlockExpressions;
pub use error::{TokenizeError, TokenizeResult};
pub use scanner::{tokenize, Tokenizer};
pub use token::{
    is_tag, is_whitespace, is_word_char, strip_any_attributes, strip_tag_attributes, Token,
    NBSP_ENTITY,
};
