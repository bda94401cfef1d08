//! Message assembly: tokenization, classification and context resolution

use super::anaphora::AnaphoraResolver;
use super::structured_input::{StructuredInput, User};
use super::tokenizer::{SnowballStemmer, Stemmer, Utterance};
use crate::error::{Error, Result};
use crate::storage::HistoryStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Utterance classifier producing categorized mentions and pronouns
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies a raw sentence
    async fn classify(&self, sentence: &str) -> Result<StructuredInput>;
}

/// A user message ready for intent handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Sender, if known
    pub user: Option<User>,
    /// Tokenized sentence
    pub utterance: Utterance,
    /// Mentions with pronouns resolved as far as history allowed
    pub structured_input: StructuredInput,
}

impl Message {
    /// The raw sentence
    pub fn sentence(&self) -> &str {
        self.utterance.text()
    }
}

/// Builds [`Message`]s from raw sentences
pub struct MessagePipeline {
    classifier: Arc<dyn Classifier>,
    resolver: AnaphoraResolver,
    store: Arc<dyn HistoryStore>,
    stemmer: Box<dyn Stemmer>,
}

impl MessagePipeline {
    /// Creates a pipeline with the default pronoun table and English stemmer
    pub fn new(classifier: Arc<dyn Classifier>, store: Arc<dyn HistoryStore>) -> Self {
        Self {
            classifier,
            resolver: AnaphoraResolver::new(store.clone()),
            store,
            stemmer: Box::new(SnowballStemmer::english()),
        }
    }

    /// Replaces the resolver, e.g. to use a custom pronoun vocabulary
    pub fn with_resolver(mut self, resolver: AnaphoraResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the stemmer
    pub fn with_stemmer(mut self, stemmer: Box<dyn Stemmer>) -> Self {
        self.stemmer = stemmer;
        self
    }

    /// Tokenizes, classifies and resolves a sentence.
    ///
    /// Never fails: a classifier error leaves the structured input empty and
    /// a resolution error leaves it partially resolved. Both are logged.
    pub async fn build_message(&self, user: Option<User>, sentence: &str) -> Message {
        let utterance = Utterance::new(sentence, self.stemmer.as_ref());

        let mut structured_input = match self.classifier.classify(sentence).await {
            Ok(input) => input,
            Err(e) => {
                error!(error = %e, "classifying sentence");
                StructuredInput::default()
            }
        };

        if let Err(e) = self
            .resolver
            .resolve(user.as_ref(), &mut structured_input)
            .await
        {
            if e.is_recoverable() {
                warn!(error = %e, "adding context");
            } else {
                error!(error = %e, "adding context");
            }
        }

        Message {
            user,
            utterance,
            structured_input,
        }
    }

    /// Route of the most recent message of the message's user
    ///
    /// # Errors
    /// [`Error::MissingUser`] when the message has no user
    pub async fn last_route(&self, message: &Message) -> Result<Option<String>> {
        let user = message.user.as_ref().ok_or(Error::MissingUser)?;
        self.store.last_route(user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::structured_input::Category;
    use crate::storage::{InMemoryHistoryStore, InputRecord};
    use chrono::Utc;

    struct FixedClassifier(StructuredInput);

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(&self, _sentence: &str) -> Result<StructuredInput> {
            Ok(self.0.clone())
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn classify(&self, _sentence: &str) -> Result<StructuredInput> {
            Err(Error::Classifier("model not loaded".to_string()))
        }
    }

    async fn history() -> Arc<InMemoryHistoryStore> {
        let store = Arc::new(InMemoryHistoryStore::new());
        store
            .push(InputRecord::new(3).with(Category::Objects, ["the red shirt"]))
            .await;
        store.push_message(3, "shopping", Utc::now()).await;
        store
    }

    #[tokio::test]
    async fn test_build_message_resolves_context() {
        let classifier = FixedClassifier(
            StructuredInput::new()
                .with_category(Category::Objects, ["it"])
                .with_pronouns(["it"]),
        );
        let pipeline = MessagePipeline::new(Arc::new(classifier), history().await);

        let message = pipeline
            .build_message(Some(User::new(3)), "How much is it?")
            .await;

        assert_eq!(message.sentence(), "How much is it?");
        assert_eq!(message.utterance.tokens(), ["how", "much", "is", "it", "?"]);
        assert_eq!(message.structured_input.objects, vec!["the red shirt"]);
    }

    #[tokio::test]
    async fn test_build_message_survives_classifier_failure() {
        let pipeline = MessagePipeline::new(Arc::new(FailingClassifier), history().await);

        let message = pipeline.build_message(Some(User::new(3)), "hello").await;

        assert!(message.structured_input.is_empty());
    }

    #[tokio::test]
    async fn test_build_message_keeps_input_without_user() {
        let classifier = FixedClassifier(
            StructuredInput::new()
                .with_category(Category::Objects, ["it"])
                .with_pronouns(["it"]),
        );
        let pipeline = MessagePipeline::new(Arc::new(classifier), history().await);

        let message = pipeline.build_message(None, "How much is it?").await;

        assert_eq!(message.structured_input.objects, vec!["it"]);
    }

    #[tokio::test]
    async fn test_last_route() {
        let pipeline = MessagePipeline::new(
            Arc::new(FixedClassifier(StructuredInput::new())),
            history().await,
        );

        let message = pipeline.build_message(Some(User::new(3)), "hi").await;
        assert_eq!(
            pipeline.last_route(&message).await.unwrap(),
            Some("shopping".to_string())
        );

        let anonymous = pipeline.build_message(None, "hi").await;
        assert!(matches!(
            pipeline.last_route(&anonymous).await,
            Err(Error::MissingUser)
        ));
    }
}
