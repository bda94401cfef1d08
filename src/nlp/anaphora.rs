//! Pronoun resolution against conversation history

use super::structured_input::{PronounTable, StructuredInput, User};
use crate::error::{Error, Result};
use crate::storage::{lookup_antecedent, HistoryStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Replaces pronouns in a [`StructuredInput`] with the mentions they refer to
///
/// Resolution is a sequential pass over the pronouns in classifier order that
/// stops at the first pronoun without an antecedent. Whatever was rewritten
/// before that point is kept; nothing after it is attempted.
#[derive(Clone)]
pub struct AnaphoraResolver {
    store: Arc<dyn HistoryStore>,
    pronouns: PronounTable,
}

impl AnaphoraResolver {
    /// Creates a resolver with the default English pronoun table
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self::with_pronouns(store, PronounTable::default())
    }

    /// Creates a resolver with a custom pronoun vocabulary
    pub fn with_pronouns(store: Arc<dyn HistoryStore>, pronouns: PronounTable) -> Self {
        Self { store, pronouns }
    }

    /// Resolves the pronouns of `input` in place.
    ///
    /// # Errors
    /// * [`Error::UnknownPronounCategory`] for a pronoun outside the table;
    ///   earlier substitutions stay applied
    /// * [`Error::MissingUser`] when a pronoun needs history and `user` is `None`
    /// * storage errors from the history store, unchanged
    ///
    /// A pronoun with no antecedent is not an error: the pass ends there and
    /// returns `Ok(())`.
    pub async fn resolve(&self, user: Option<&User>, input: &mut StructuredInput) -> Result<()> {
        let pronouns = input.pronouns.clone();

        for pronoun in &pronouns {
            let category = self
                .pronouns
                .category(pronoun)
                .ok_or_else(|| Error::UnknownPronounCategory(pronoun.clone()))?;

            let antecedent = lookup_antecedent(self.store.as_ref(), user, category).await?;
            if antecedent.is_empty() {
                debug!(pronoun = %pronoun, %category, "no antecedent, stopping resolution");
                return Ok(());
            }

            let replaced = input.substitute(category, pronoun, &antecedent);
            info!(
                pronoun = %pronoun,
                %category,
                context = %antecedent,
                replaced,
                "context found"
            );
        }

        Ok(())
    }
}
