//! Categorized entity mentions produced by the utterance classifier

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The four entity categories a mention or pronoun can belong to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Things: products, items, topics
    Objects,
    /// People and organizations
    Actors,
    /// Dates, times and durations
    Times,
    /// Locations
    Places,
}

impl Category {
    /// All categories, in column order
    pub const ALL: [Category; 4] = [
        Category::Objects,
        Category::Actors,
        Category::Times,
        Category::Places,
    ];

    /// Column name of the category in the history table
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Objects => "objects",
            Category::Actors => "actors",
            Category::Times => "times",
            Category::Places => "places",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "objects" => Ok(Category::Objects),
            "actors" => Ok(Category::Actors),
            "times" => Ok(Category::Times),
            "places" => Ok(Category::Places),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Identity used as the key for historical lookups
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    /// Numeric user identifier
    pub id: u64,
}

impl User {
    /// Creates a user reference
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Immutable mapping from pronoun to the category it stands in for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PronounTable {
    entries: HashMap<String, Category>,
}

impl PronounTable {
    /// Creates a table from explicit pronoun/category pairs
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Category)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(pronoun, category)| (pronoun.into(), category))
                .collect(),
        }
    }

    /// Category of a pronoun, if it is part of the vocabulary
    pub fn category(&self, pronoun: &str) -> Option<Category> {
        self.entries.get(pronoun).copied()
    }
}

impl Default for PronounTable {
    /// English vocabulary of the classifier
    fn default() -> Self {
        Self::new([
            ("me", Category::Actors),
            ("us", Category::Actors),
            ("you", Category::Actors),
            ("him", Category::Actors),
            ("her", Category::Actors),
            ("them", Category::Actors),
            ("he", Category::Actors),
            ("she", Category::Actors),
            ("they", Category::Actors),
            ("it", Category::Objects),
            ("that", Category::Objects),
            ("this", Category::Objects),
            ("those", Category::Objects),
            ("these", Category::Objects),
            ("then", Category::Times),
            ("there", Category::Places),
            ("here", Category::Places),
        ])
    }
}

/// Categorized entity mentions of one utterance plus its detected pronouns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredInput {
    /// Object mentions
    #[serde(default)]
    pub objects: Vec<String>,
    /// Actor mentions
    #[serde(default)]
    pub actors: Vec<String>,
    /// Time mentions
    #[serde(default)]
    pub times: Vec<String>,
    /// Place mentions
    #[serde(default)]
    pub places: Vec<String>,
    /// Pronouns in the order the classifier found them
    #[serde(default)]
    pub pronouns: Vec<String>,
}

impl StructuredInput {
    /// Creates an empty structured input
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mentions of a category
    pub fn with_category<I, S>(mut self, category: Category, mentions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.category_mut(category) = mentions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the detected pronouns
    pub fn with_pronouns<I, S>(mut self, pronouns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pronouns = pronouns.into_iter().map(Into::into).collect();
        self
    }

    /// Mentions of a category
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Objects => &self.objects,
            Category::Actors => &self.actors,
            Category::Times => &self.times,
            Category::Places => &self.places,
        }
    }

    /// Mutable mentions of a category
    pub fn category_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Objects => &mut self.objects,
            Category::Actors => &mut self.actors,
            Category::Times => &mut self.times,
            Category::Places => &mut self.places,
        }
    }

    /// Detected pronouns
    pub fn pronouns(&self) -> &[String] {
        &self.pronouns
    }

    /// Replaces every mention equal to `pronoun` in `category`.
    ///
    /// Returns the number of replaced mentions.
    pub fn substitute(&mut self, category: Category, pronoun: &str, antecedent: &str) -> usize {
        let mut replaced = 0;
        for mention in self.category_mut(category).iter_mut() {
            if mention.as_str() == pronoun {
                *mention = antecedent.to_string();
                replaced += 1;
            }
        }
        replaced
    }

    /// Whether no mention and no pronoun was detected
    pub fn is_empty(&self) -> bool {
        self.pronouns.is_empty() && Category::ALL.iter().all(|c| self.category(*c).is_empty())
    }
}
