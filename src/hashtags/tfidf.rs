// TF-IDF weighted term extraction — the default mode.
//
// Each post is a separate document for IDF computation, so words that
// appear in every post get downweighted while words distinctive to some
// posts get boosted. An extended stopword set removes the filler that
// dominates social text (generic English plus discussion-platform noise),
// and normalized community names join the bank so secondary searches also
// cover the communities themselves.

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::info;

use crate::hashtags::bank::{normalize_term, HashtagBank, HashtagBankEntry};
use crate::hashtags::traits::TermExtractor;
use crate::model::PostRecord;

/// Domain-generic filler that scores high on frequency but is useless as a
/// search term. Tuned against real harvest output.
const DOMAIN_STOPWORDS: [&str; 42] = [
    "like", "just", "know", "think", "thing", "things", "people", "said", "also", "would",
    "could", "should", "still", "even", "going", "make", "made", "want", "need", "much",
    "many", "really", "look", "take", "though", "well", "without", "every", "around",
    "another", "others", "done", "being", "next", "used", "time", "good", "great", "post",
    "comment", "reddit", "thread",
];

/// TF-IDF based term extractor.
pub struct TfIdfExtractor {
    /// How many ranked words to pull from the TF-IDF scoring before the
    /// bank cap applies.
    pub top_n_keywords: usize,
    /// Minimum word length admitted to documents.
    pub min_word_len: usize,
}

impl Default for TfIdfExtractor {
    fn default() -> Self {
        Self {
            top_n_keywords: 200,
            min_word_len: 4,
        }
    }
}

impl TfIdfExtractor {
    /// Weighted extraction merged with community names. Community names
    /// enter with a weight above the scored maximum so they survive the
    /// cap — they are known-good search terms by construction.
    pub fn extract_with_communities(
        &self,
        posts: &[PostRecord],
        communities: &[String],
        max_terms: usize,
    ) -> HashtagBank {
        if posts.is_empty() {
            return HashtagBank::default();
        }

        let documents: Vec<String> = posts.iter().map(|p| self.preprocess(&p.full_text())).collect();

        let mut stop_words: Vec<String> = get(LANGUAGE::English);
        stop_words.extend(DOMAIN_STOPWORDS.iter().map(|s| s.to_string()));

        let params = TfIdfParams::UnprocessedDocuments(&documents, &stop_words, None);
        let tfidf = TfIdf::new(params);
        let ranked: Vec<(String, f32)> = tfidf.get_ranked_word_scores(self.top_n_keywords);

        let top_score = ranked.first().map(|(_, s)| *s as f64).unwrap_or(1.0);

        let mut candidates: Vec<HashtagBankEntry> = communities
            .iter()
            .filter(|name| name.chars().all(char::is_alphanumeric) && name.len() > 2)
            .map(|name| HashtagBankEntry {
                term: normalize_term(name),
                weight: top_score + 1.0,
                origin: Some("community".to_string()),
            })
            .collect();

        candidates.extend(
            ranked
                .into_iter()
                .filter(|(word, _)| word.len() >= self.min_word_len)
                .map(|(word, score)| HashtagBankEntry {
                    term: word,
                    weight: score as f64,
                    origin: Some("tfidf".to_string()),
                }),
        );

        let bank = HashtagBank::from_entries(candidates, max_terms);
        info!(
            posts = posts.len(),
            communities = communities.len(),
            terms = bank.len(),
            "Weighted term bank built"
        );
        bank
    }

    /// Lowercase, strip URLs, keep word characters and basic punctuation.
    fn preprocess(&self, text: &str) -> String {
        let url_re = Regex::new(r"https?://\S+").expect("static regex");
        let stripped = url_re.replace_all(text, " ").to_lowercase();
        let cleaned: String = stripped
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || ".,!?".contains(c) {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl TermExtractor for TfIdfExtractor {
    fn extract(&self, posts: &[PostRecord], max_terms: usize) -> HashtagBank {
        self.extract_with_communities(posts, &[], max_terms)
    }
}
