// Per-source quota sampling.
//
// Hard-cap sources (YouTube) return a ranked top-K whose order already
// encodes relevance — truncation preserves that signal. Everything else
// is uniformly subsampled so the corpus does not inherit whatever
// retrieval-order bias the collector happened to have. The RNG is
// injected so tests can pin the exact sampled set.

use rand::rngs::StdRng;
use rand::seq::index;

use crate::model::{PostRecord, QuotaSpec};

/// Apply a quota to one source's raw results. Output length never exceeds
/// `quota.max_posts`; under-quota input passes through unchanged.
pub fn sample(raw: Vec<PostRecord>, quota: &QuotaSpec, rng: &mut StdRng) -> Vec<PostRecord> {
    if raw.len() <= quota.max_posts {
        return raw;
    }

    if quota.hard_cap {
        let mut truncated = raw;
        truncated.truncate(quota.max_posts);
        return truncated;
    }

    // Uniform sample without replacement, preserving collector order
    // among the survivors.
    let mut picked = index::sample(rng, raw.len(), quota.max_posts).into_vec();
    picked.sort_unstable();
    let picked_set: std::collections::HashSet<usize> = picked.into_iter().collect();

    raw.into_iter()
        .enumerate()
        .filter_map(|(i, record)| picked_set.contains(&i).then_some(record))
        .collect()
}
