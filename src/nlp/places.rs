//! Gazetteer place-name extraction
//!
//! Candidates are every unigram and bigram from the first locative
//! preposition onward. The gazetteer orders matches by name length, so
//! "New York" comes back ahead of "York".

use super::tokenizer::Utterance;
use crate::error::Result;
use crate::storage::{Gazetteer, PlaceRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Prepositions after which a location usually follows
const LOCATIVE_PREPOSITIONS: [&str; 3] = ["at", "in", "on"];

static NON_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern is valid"));

/// Words of a sentence with every non-word, non-space character removed
pub fn place_words(sentence: &str) -> Vec<String> {
    NON_WORDS
        .replace_all(sentence, "")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Index of the first locative preposition, or 0 when there is none
pub fn locative_start(words: &[String]) -> usize {
    words
        .iter()
        .position(|w| {
            LOCATIVE_PREPOSITIONS
                .iter()
                .any(|p| w.eq_ignore_ascii_case(p))
        })
        .unwrap_or(0)
}

/// Adjacent word pairs from `start`, joined by a single space
pub fn bigrams(words: &[String], start: usize) -> Vec<String> {
    words
        .get(start..)
        .unwrap_or_default()
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect()
}

/// Unigram and bigram match candidates of a sentence, unigrams first
pub fn place_candidates(sentence: &str) -> Vec<String> {
    let words = place_words(sentence);
    let start = locative_start(&words);

    let mut candidates: Vec<String> = words[start..].to_vec();
    candidates.extend(bigrams(&words, start));
    candidates
}

/// Places of `country_code` named in the utterance, longest names first.
///
/// Returns an empty list without querying when the utterance has no words.
pub async fn extract_places(
    utterance: &Utterance,
    gazetteer: &dyn Gazetteer,
    country_code: &str,
) -> Result<Vec<PlaceRecord>> {
    let candidates = place_candidates(utterance.text());
    debug!(count = candidates.len(), "place candidates");
    if candidates.is_empty() {
        return Ok(Vec::new());
    }
    gazetteer.find_places(&candidates, country_code).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryGazetteer;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_place_words_strip_punctuation() {
        assert_eq!(
            place_words("Flights to St. Louis, please!"),
            words(&["Flights", "to", "St", "Louis", "please"])
        );
    }

    #[test]
    fn test_locative_start() {
        assert_eq!(locative_start(&words(&["meet", "me", "in", "new", "york"])), 2);
        assert_eq!(locative_start(&words(&["dinner", "At", "Boston", "on", "Friday"])), 1);
        assert_eq!(locative_start(&words(&["boston", "weather"])), 0);
    }

    #[test]
    fn test_bigrams_from_start() {
        let w = words(&["meet", "me", "in", "new", "york", "city"]);
        assert_eq!(bigrams(&w, 2), vec!["in new", "new york", "york city"]);
        assert!(bigrams(&w, 5).is_empty());
        assert!(bigrams(&w, 9).is_empty());
    }

    #[test]
    fn test_candidates_without_preposition_cover_whole_sentence() {
        let candidates = place_candidates("Boston weather");
        assert_eq!(candidates, words(&["Boston", "weather", "Boston weather"]));
    }

    #[test]
    fn test_candidates_skip_words_before_preposition() {
        let candidates = place_candidates("meet me in New York City");
        assert_eq!(
            candidates,
            words(&["in", "New", "York", "City", "in New", "New York", "York City"])
        );
    }

    #[tokio::test]
    async fn test_extract_places_longest_first() {
        let gazetteer = InMemoryGazetteer::new(vec![
            PlaceRecord::new("York", "US"),
            PlaceRecord::new("New York", "US"),
        ]);
        let utterance = Utterance::parse("Meet me in New York City");

        let places = extract_places(&utterance, &gazetteer, "US").await.unwrap();
        let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["New York", "York"]);
    }

    #[tokio::test]
    async fn test_extract_places_respects_country() {
        let gazetteer = InMemoryGazetteer::new(vec![PlaceRecord::new("Paris", "FR")]);
        let utterance = Utterance::parse("a hotel in Paris");

        let places = extract_places(&utterance, &gazetteer, "US").await.unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_extract_places_empty_utterance_skips_query() {
        let gazetteer = InMemoryGazetteer::new(vec![PlaceRecord::new("Boston", "US")]);
        let utterance = Utterance::parse("?!");

        let places = extract_places(&utterance, &gazetteer, "US").await.unwrap();
        assert!(places.is_empty());
        assert_eq!(gazetteer.query_count(), 0);
    }
}
