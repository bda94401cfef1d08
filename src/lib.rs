//! # anaphora-rs
//!
//! Context resolution for dialogue systems.
//!
//! Turns a user utterance into tokens and stems, resolves pronouns in the
//! classifier's categorized mentions against the user's conversation history,
//! and extracts place names by gazetteer lookup. History and gazetteer are
//! read-only relational tables reached through [`storage`].

pub mod config;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod storage;

pub use error::{Error, Result};
pub use nlp::{
    extract_places, AnaphoraResolver, Category, Classifier, Message, MessagePipeline,
    PronounTable, StructuredInput, User, Utterance,
};
pub use storage::{lookup_antecedent, Gazetteer, HistoryStore, PlaceRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::UnknownPronounCategory("test".to_string());
        assert!(err.to_string().contains("test"));
    }
}
