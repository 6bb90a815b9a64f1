// Term extractor trait — swap-ready abstraction.
//
// The two modes (noun frequency, TF-IDF weighting) are interchangeable
// behind this seam; the pipeline only sees a bank come out.

use crate::hashtags::bank::HashtagBank;
use crate::model::PostRecord;

/// Extract a capped term bank from harvested posts.
pub trait TermExtractor {
    fn extract(&self, posts: &[PostRecord], max_terms: usize) -> HashtagBank;
}
