// Noun-frequency extraction — the simple mode.
//
// Tokenize all harvested text, strip URLs, stopwords, and non-alphabetic
// tokens, keep noun-like words, rank by raw frequency. A full POS tagger
// would be more precise; a suffix/shape heuristic keeps the same filtering
// intent without a model dependency, and the TF-IDF mode exists for runs
// that need better weighting anyway.

use std::collections::{HashMap, HashSet};

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

use crate::hashtags::bank::{HashtagBank, HashtagBankEntry};
use crate::hashtags::traits::TermExtractor;
use crate::model::PostRecord;

/// Frequency-ranked noun extraction.
pub struct FrequencyExtractor {
    /// Minimum token length to consider.
    pub min_len: usize,
}

impl Default for FrequencyExtractor {
    fn default() -> Self {
        Self { min_len: 3 }
    }
}

/// Suffixes that mark a token as verb/adverb/adjective-like rather than a
/// noun. Deliberately small: false negatives cost little (the bank is
/// capped anyway), false positives pollute downstream queries.
const NON_NOUN_SUFFIXES: [&str; 6] = ["ing", "edly", "ously", "fully", "ably", "ibly"];

fn looks_like_noun(word: &str) -> bool {
    !NON_NOUN_SUFFIXES.iter().any(|s| word.ends_with(s))
}

impl TermExtractor for FrequencyExtractor {
    fn extract(&self, posts: &[PostRecord], max_terms: usize) -> HashtagBank {
        if posts.is_empty() {
            return HashtagBank::default();
        }

        let url_re = Regex::new(r"https?://\S+").expect("static regex");
        let stop: HashSet<String> = get(LANGUAGE::English).into_iter().collect();

        let mut counts: HashMap<String, u64> = HashMap::new();
        for post in posts {
            let text = url_re.replace_all(&post.full_text(), " ").to_lowercase();
            for token in text.split(|c: char| !c.is_alphabetic()) {
                if token.len() < self.min_len
                    || stop.contains(token)
                    || !looks_like_noun(token)
                {
                    continue;
                }
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }

        let candidates = counts
            .into_iter()
            .map(|(term, count)| HashtagBankEntry {
                term,
                weight: count as f64,
                origin: Some("nouns".to_string()),
            })
            .collect();

        HashtagBank::from_entries(candidates, max_terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceId;
    use chrono::Utc;

    fn post(title: &str, body: &str) -> PostRecord {
        PostRecord {
            source: SourceId::Reddit,
            title: title.to_string(),
            body: body.to_string(),
            author: "t".to_string(),
            url: String::new(),
            score: 0,
            created_at: Utc::now(),
            community: None,
        }
    }

    #[test]
    fn empty_posts_yield_empty_bank() {
        let bank = FrequencyExtractor::default().extract(&[], 50);
        assert!(bank.is_empty());
    }

    #[test]
    fn ranks_repeated_nouns_highest() {
        let posts = vec![
            post("climate policy debate", "climate change and climate science"),
            post("energy policy", "renewable energy and climate goals"),
        ];
        let bank = FrequencyExtractor::default().extract(&posts, 10);
        assert_eq!(bank.top_terms(1), vec!["climate".to_string()]);
    }

    #[test]
    fn strips_stopwords_and_urls() {
        let posts = vec![post(
            "the and of with",
            "see https://example.com/page for the details",
        )];
        let bank = FrequencyExtractor::default().extract(&posts, 10);
        let terms = bank.top_terms(10);
        assert!(!terms.iter().any(|t| t == "the" || t == "and"));
        assert!(!terms.iter().any(|t| t.contains("example")));
    }

    #[test]
    fn filters_verbal_forms() {
        assert!(!looks_like_noun("running"));
        assert!(looks_like_noun("runner"));
        assert!(looks_like_noun("policy"));
    }

    #[test]
    fn respects_max_terms() {
        let posts = vec![post(
            "alpha beta gamma delta epsilon zeta",
            "theta iota kappa lambda sigma omega",
        )];
        let bank = FrequencyExtractor::default().extract(&posts, 4);
        assert!(bank.len() <= 4);
    }
}
