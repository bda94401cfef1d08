//! Error types for context resolution and entity extraction.

use thiserror::Error;

/// Result type alias for context resolution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for context resolution and entity extraction
#[derive(Debug, Error)]
pub enum Error {
    /// A lookup against conversation history was attempted without a user
    #[error("missing user")]
    MissingUser,

    /// The classifier produced a pronoun outside the known vocabulary
    #[error("unknown category for pronoun: {0}")]
    UnknownPronounCategory(String),

    /// Read failure from the history store or the gazetteer
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A stored category column could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// The external utterance classifier failed
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Invalid configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl Error {
    /// Whether the caller may carry on with an unresolved input.
    ///
    /// Context resolution is enrichment: an unsupported pronoun or a failed
    /// classification leaves the turn usable, while a missing identity or a
    /// storage failure has to reach the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownPronounCategory(_) | Error::Classifier(_)
        )
    }
}
