//! Whitespace tokenizer.
//!
//! A token is one whitespace-delimited unit of text, spoken as a single
//! synthesis request. Punctuation stays attached to its word so the caller
//! can display the text exactly as typed.

use serde::{Deserialize, Serialize};

/// One word of the input text, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// The word as it appears in the source text.
    pub text: String,
    /// Zero-based position in reading order.
    pub index: usize,
}

/// Split `text` on runs of whitespace, dropping empty fragments.
///
/// Indices are contiguous from zero.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, word)| Token {
            text: word.to_string(),
            index,
        })
        .collect()
}
