//! SQLite history store and gazetteer
//!
//! Category columns hold JSON arrays of strings, so "has an object mention"
//! is expressed with `json_array_length`.

use super::{decode_mentions, sql_user_id, unique_candidates, Gazetteer, HistoryStore, PlaceRecord};
use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::nlp::structured_input::Category;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

/// Latest qualifying turn, one statement per category column
fn latest_mentions_sql(category: Category) -> &'static str {
    match category {
        Category::Objects => {
            "SELECT objects FROM inputs \
             WHERE user_id = ?1 AND json_array_length(objects) > 0 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        }
        Category::Actors => {
            "SELECT actors FROM inputs \
             WHERE user_id = ?1 AND json_array_length(objects) > 0 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        }
        Category::Times => {
            "SELECT times FROM inputs \
             WHERE user_id = ?1 AND json_array_length(objects) > 0 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        }
        Category::Places => {
            "SELECT places FROM inputs \
             WHERE user_id = ?1 AND json_array_length(objects) > 0 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        }
    }
}

const LAST_ROUTE_SQL: &str = "SELECT route FROM messages \
     WHERE user_id = ?1 \
     ORDER BY created_at DESC, id DESC LIMIT 1";

/// History store and gazetteer over a caller-supplied SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wraps an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn latest_mentions(
        &self,
        user_id: u64,
        category: Category,
    ) -> Result<Option<Vec<String>>> {
        let row = sqlx::query(latest_mentions_sql(category))
            .bind(sql_user_id(user_id)?)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(user_id, %category, "no qualifying turn");
            return Ok(None);
        };
        let raw: Option<String> = row.try_get(0)?;
        match raw {
            Some(raw) => decode_mentions(&raw).map(Some),
            None => Ok(Some(Vec::new())),
        }
    }

    async fn last_route(&self, user_id: u64) -> Result<Option<String>> {
        let route = sqlx::query_scalar::<_, String>(LAST_ROUTE_SQL)
            .bind(sql_user_id(user_id)?)
            .fetch_optional(&self.pool)
            .await?;
        Ok(route)
    }
}

#[async_trait]
impl Gazetteer for SqliteStore {
    async fn find_places(
        &self,
        candidates: &[String],
        country_code: &str,
    ) -> Result<Vec<PlaceRecord>> {
        let candidates = unique_candidates(candidates);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT name, country_code FROM cities WHERE country_code = ");
        builder.push_bind(country_code.to_string());
        builder.push(" AND name IN (");
        let mut names = builder.separated(", ");
        for candidate in &candidates {
            names.push_bind(candidate.to_string());
        }
        names.push_unseparated(") ORDER BY LENGTH(name) DESC, name ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        debug!(candidates = candidates.len(), matches = rows.len(), "gazetteer query");

        rows.iter()
            .map(|row| -> Result<PlaceRecord> {
                Ok(PlaceRecord {
                    name: row.try_get("name")?,
                    country_code: row.try_get("country_code")?,
                })
            })
            .collect()
    }
}
