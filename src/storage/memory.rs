use super::{unique_candidates, Gazetteer, HistoryStore, PlaceRecord};
use crate::error::Result;
use crate::nlp::structured_input::Category;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One recorded turn of a user's conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub user_id: u64,
    pub objects: Vec<String>,
    pub actors: Vec<String>,
    pub times: Vec<String>,
    pub places: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl InputRecord {
    /// Creates an empty turn for `user_id` stamped with the current time
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            objects: Vec::new(),
            actors: Vec::new(),
            times: Vec::new(),
            places: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Sets the mentions of a category
    pub fn with<I, S>(mut self, category: Category, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mentions = mentions.into_iter().map(Into::into).collect();
        match category {
            Category::Objects => self.objects = mentions,
            Category::Actors => self.actors = mentions,
            Category::Times => self.times = mentions,
            Category::Places => self.places = mentions,
        }
        self
    }

    /// Sets the creation time
    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Mentions of a category
    pub fn mentions(&self, category: Category) -> &[String] {
        match category {
            Category::Objects => &self.objects,
            Category::Actors => &self.actors,
            Category::Times => &self.times,
            Category::Places => &self.places,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredMessage {
    user_id: u64,
    route: String,
    created_at: DateTime<Utc>,
}

/// In-memory conversation history
///
/// Records are kept in insertion order; when two turns share a timestamp the
/// later insertion counts as more recent. Meant for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    inputs: Arc<RwLock<Vec<InputRecord>>>,
    messages: Arc<RwLock<Vec<StoredMessage>>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryHistoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a turn
    pub async fn push(&self, record: InputRecord) {
        self.inputs.write().await.push(record);
    }

    /// Records a message routed to `route`
    pub async fn push_message(&self, user_id: u64, route: impl Into<String>, created_at: DateTime<Utc>) {
        self.messages.write().await.push(StoredMessage {
            user_id,
            route: route.into(),
            created_at,
        });
    }

    /// Number of reads served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn latest_mentions(
        &self,
        user_id: u64,
        category: Category,
    ) -> Result<Option<Vec<String>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let inputs = self.inputs.read().await;

        let latest = inputs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.user_id == user_id && !r.objects.is_empty())
            .max_by_key(|(idx, r)| (r.created_at, *idx))
            .map(|(_, r)| r.mentions(category).to_vec());
        Ok(latest)
    }

    async fn last_route(&self, user_id: u64) -> Result<Option<String>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let messages = self.messages.read().await;

        let route = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.user_id == user_id)
            .max_by_key(|(idx, m)| (m.created_at, *idx))
            .map(|(_, m)| m.route.clone());
        Ok(route)
    }
}

/// In-memory gazetteer
#[derive(Debug, Clone, Default)]
pub struct InMemoryGazetteer {
    places: Arc<Vec<PlaceRecord>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryGazetteer {
    /// Creates a gazetteer over a fixed set of places
    pub fn new(places: Vec<PlaceRecord>) -> Self {
        Self {
            places: Arc::new(places),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of reads served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gazetteer for InMemoryGazetteer {
    async fn find_places(
        &self,
        candidates: &[String],
        country_code: &str,
    ) -> Result<Vec<PlaceRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let candidates = unique_candidates(candidates);

        let mut found: Vec<PlaceRecord> = self
            .places
            .iter()
            .filter(|p| p.country_code == country_code && candidates.contains(&p.name.as_str()))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.name
                .chars()
                .count()
                .cmp(&a.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(found)
    }
}
