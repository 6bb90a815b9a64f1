// HashtagBank — the ranked, deduplicated term set driving secondary search.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One derived term with its extraction weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagBankEntry {
    /// Case-folded term, no leading '#'.
    pub term: String,
    /// Frequency count or aggregate TF-IDF score, depending on mode.
    pub weight: f64,
    /// Where the term came from ("tfidf", "nouns", "community").
    pub origin: Option<String>,
}

/// Deduplicated, weight-ordered term bank, capped at a configured size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashtagBank {
    entries: Vec<HashtagBankEntry>,
}

impl HashtagBank {
    /// Build a bank from candidate entries: normalize, collapse duplicates
    /// onto their highest-weight occurrence, order by descending weight, cap.
    pub fn from_entries(candidates: Vec<HashtagBankEntry>, max_terms: usize) -> Self {
        let mut best: HashMap<String, HashtagBankEntry> = HashMap::new();
        for mut e in candidates {
            e.term = normalize_term(&e.term);
            if e.term.len() < 2 {
                continue;
            }
            match best.entry(e.term.clone()) {
                Entry::Occupied(mut slot) => {
                    if e.weight > slot.get().weight {
                        slot.insert(e);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(e);
                }
            }
        }

        let mut entries: Vec<HashtagBankEntry> = best.into_values().collect();
        entries.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
        entries.truncate(max_terms);
        Self { entries }
    }

    pub fn entries(&self) -> &[HashtagBankEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` highest-weight terms — the bounded subset handed to each
    /// secondary collector.
    pub fn top_terms(&self, n: usize) -> Vec<String> {
        self.entries.iter().take(n).map(|e| e.term.clone()).collect()
    }
}

/// Case-fold and strip anything that is not a word character. Terms are
/// queries, not display strings — '#' prefixes and punctuation go.
pub fn normalize_term(term: &str) -> String {
    term.trim()
        .trim_start_matches('#')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(term: &str, weight: f64) -> HashtagBankEntry {
        HashtagBankEntry {
            term: term.to_string(),
            weight,
            origin: None,
        }
    }

    #[test]
    fn dedupes_after_normalization() {
        let bank = HashtagBank::from_entries(
            vec![entry("#Rust", 3.0), entry("rust", 2.0), entry("tokio", 1.0)],
            10,
        );
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.top_terms(1), vec!["rust".to_string()]);
    }

    #[test]
    fn duplicate_keeps_its_highest_weight() {
        // The heavy duplicate arrives last; the term must still rank by it.
        let bank = HashtagBank::from_entries(
            vec![entry("rust", 1.0), entry("tokio", 3.0), entry("#Rust", 5.0)],
            10,
        );
        assert_eq!(
            bank.top_terms(2),
            vec!["rust".to_string(), "tokio".to_string()]
        );
    }

    #[test]
    fn caps_at_max_terms() {
        let candidates = (0..50).map(|i| entry(&format!("term{i}"), i as f64)).collect();
        let bank = HashtagBank::from_entries(candidates, 10);
        assert_eq!(bank.len(), 10);
        // Highest weights survive the cap.
        assert_eq!(bank.top_terms(1), vec!["term49".to_string()]);
    }

    #[test]
    fn orders_by_descending_weight() {
        let bank = HashtagBank::from_entries(
            vec![entry("low", 1.0), entry("high", 9.0), entry("mid", 5.0)],
            10,
        );
        assert_eq!(
            bank.top_terms(3),
            vec!["high".to_string(), "mid".to_string(), "low".to_string()]
        );
    }

    #[test]
    fn drops_terms_that_normalize_away() {
        let bank = HashtagBank::from_entries(vec![entry("##", 5.0), entry("ok", 1.0)], 10);
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn normalize_strips_hash_and_punctuation() {
        assert_eq!(normalize_term("#Machine-Learning!"), "machinelearning");
        assert_eq!(normalize_term("  AI  "), "ai");
    }
}
