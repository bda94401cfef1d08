//! Natural language processing for user utterances
//!
//! This module provides tokenization, categorized entity mentions,
//! pronoun resolution against conversation history, gazetteer place
//! extraction and message assembly.

pub mod anaphora;
pub mod message;
pub mod places;
pub mod structured_input;
pub mod tokenizer;

pub use anaphora::AnaphoraResolver;
pub use message::{Classifier, Message, MessagePipeline};
pub use places::extract_places;
pub use structured_input::{Category, PronounTable, StructuredInput, User};
pub use tokenizer::{SnowballStemmer, Stemmer, Utterance};
