//! Utterance tokenization and stemming

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters split off the end of a word into their own tokens
const TRAILING_PUNCTUATION: [char; 8] = ['\'', '"', ',', '.', ':', ';', '!', '?'];

/// Characters trimmed from a word before it is stemmed
const STEM_TRIM: [char; 8] = [',', '.', '?', ';', ':', '!', '-', '/'];

/// Reduces a word to its root form
pub trait Stemmer: Send + Sync {
    /// Returns the stem of a single lower-cased word
    fn stem(&self, word: &str) -> String;
}

/// Snowball (Porter2) stemmer for English
pub struct SnowballStemmer {
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    /// Creates an English stemmer
    pub fn english() -> Self {
        Self {
            inner: rust_stemmers::Stemmer::create(rust_stemmers::Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer").finish_non_exhaustive()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }
}

/// A raw user utterance with its derived token and stem sequences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    text: String,
    tokens: Vec<String>,
    stems: Vec<String>,
}

impl Utterance {
    /// Tokenizes and stems `text` with the given stemmer
    pub fn new(text: impl Into<String>, stemmer: &dyn Stemmer) -> Self {
        let text = text.into();
        let tokens = sentence_fields(&text);
        let stems = stems(&text, stemmer);
        Self {
            text,
            tokens,
            stems,
        }
    }

    /// Tokenizes and stems `text` with the English Snowball stemmer
    pub fn parse(text: impl Into<String>) -> Self {
        Self::new(text, &SnowballStemmer::english())
    }

    /// The raw text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lower-cased word tokens, trailing punctuation as separate tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// One stem per whitespace-separated word
    pub fn stems(&self) -> &[String] {
        &self.stems
    }
}

/// Splits a sentence into lower-cased words, emitting trailing punctuation
/// as individual tokens after the word it was attached to.
pub fn sentence_fields(sentence: &str) -> Vec<String> {
    let mut fields = Vec::new();
    for word in sentence.split_whitespace() {
        let core = word.trim_end_matches(TRAILING_PUNCTUATION);
        if !core.is_empty() {
            fields.push(core.to_lowercase());
        }
        fields.extend(word[core.len()..].chars().map(String::from));
    }
    fields
}

/// Stems every whitespace-separated word of a sentence.
///
/// The output has exactly one entry per word, so a word made only of
/// trimmed characters yields an empty stem.
pub fn stems(sentence: &str, stemmer: &dyn Stemmer) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|word| {
            let word = word.trim_end_matches(STEM_TRIM).to_lowercase();
            if word.is_empty() {
                word
            } else {
                stemmer.stem(&word)
            }
        })
        .collect()
}
