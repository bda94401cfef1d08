//! Read-only access to conversation history and the place gazetteer
//!
//! The history store and the gazetteer are shared relational tables owned by
//! the surrounding system. This module only queries them; pools are supplied
//! by the caller and schema management happens elsewhere.

pub mod memory;
pub mod postgres;
pub mod sqlite;

use crate::error::{Error, Result};
use crate::nlp::structured_input::{Category, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use memory::{InMemoryGazetteer, InMemoryHistoryStore, InputRecord};
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// A known place name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Canonical place name
    pub name: String,
    /// ISO country code
    pub country_code: String,
}

impl PlaceRecord {
    /// Creates a place record
    pub fn new(name: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country_code: country_code.into(),
        }
    }
}

/// Per-user history of prior conversational turns
///
/// Implementations back onto PostgreSQL, SQLite or memory. Every method is a
/// single read; none of them retries.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Mentions of `category` from the user's most recent turn that had at
    /// least one object mention.
    ///
    /// # Returns
    /// `None` when the user has no such turn
    async fn latest_mentions(&self, user_id: u64, category: Category)
        -> Result<Option<Vec<String>>>;

    /// Route of the user's most recent message
    ///
    /// # Returns
    /// `None` when the user has no messages
    async fn last_route(&self, user_id: u64) -> Result<Option<String>>;
}

/// Reference table of known places
#[async_trait]
pub trait Gazetteer: Send + Sync {
    /// Places named exactly (case-sensitively) like one of `candidates`,
    /// restricted to `country_code`, longest names first.
    async fn find_places(
        &self,
        candidates: &[String],
        country_code: &str,
    ) -> Result<Vec<PlaceRecord>>;
}

/// Most recent mention of `category` for `user`.
///
/// Returns an empty string when the user has no turn with an object mention
/// or when that turn has no mention of `category`. Fails with
/// [`Error::MissingUser`] before touching the store when no user is given.
pub async fn lookup_antecedent(
    store: &dyn HistoryStore,
    user: Option<&User>,
    category: Category,
) -> Result<String> {
    let user = user.ok_or(Error::MissingUser)?;
    debug!(user_id = user.id, %category, "looking up antecedent");

    let antecedent = store
        .latest_mentions(user.id, category)
        .await?
        .and_then(|mut mentions| mentions.pop())
        .unwrap_or_default();
    Ok(antecedent)
}

/// Decodes a category column stored as a JSON array of strings
pub(crate) fn decode_mentions(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Decode(format!("invalid mention array {:?}: {}", raw, e)))
}

/// User ids are stored as signed 64-bit integers
pub(crate) fn sql_user_id(user_id: u64) -> Result<i64> {
    i64::try_from(user_id).map_err(|e| Error::Storage(sqlx::Error::Encode(Box::new(e))))
}

/// Drops repeated candidates, keeping first occurrences in order
pub(crate) fn unique_candidates(candidates: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .iter()
        .map(String::as_str)
        .filter(|c| seen.insert(*c))
        .collect()
}
