// Term bank derivation — reducing harvested text to search terms.

pub mod bank;
pub mod frequency;
pub mod tfidf;
pub mod traits;

pub use bank::{HashtagBank, HashtagBankEntry};
pub use frequency::FrequencyExtractor;
pub use tfidf::TfIdfExtractor;
pub use traits::TermExtractor;

use crate::model::PostRecord;

/// Which extraction strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Frequency-ranked noun-like tokens.
    NounFrequency,
    /// TF-IDF weighted terms, merged with community names.
    WeightedTerms,
}

/// Run the configured extraction mode over harvested posts.
///
/// Empty input yields an empty bank; callers must then fall back to the
/// raw seed term for fan-out.
pub fn extract(
    mode: ExtractionMode,
    posts: &[PostRecord],
    communities: &[String],
    max_terms: usize,
) -> HashtagBank {
    match mode {
        ExtractionMode::NounFrequency => FrequencyExtractor::default().extract(posts, max_terms),
        ExtractionMode::WeightedTerms => {
            TfIdfExtractor::default().extract_with_communities(posts, communities, max_terms)
        }
    }
}
