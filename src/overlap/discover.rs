// Overlap scoring: conditioned probability over global baseline.
//
// For each community in the seed-conditioned histogram, compute
// ratio = P(community | seed users) / P(community). A ratio well above 1
// means the seed's audience participates there disproportionately often —
// those are the topically adjacent communities worth harvesting.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{with_retry, CollectError};
use crate::overlap::stats::CommunityStatsProvider;

/// Communities whose global baseline probability falls below this are not
/// scored — dividing by a near-zero baseline would rank statistically
/// insignificant communities as "highly overlapping".
pub const GLOBAL_PROBABILITY_EPSILON: f64 = 1e-4;

/// One scored community from overlap discovery.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityOverlapScore {
    pub community: String,
    /// Conditioned probability divided by global baseline probability.
    pub ratio: f64,
    /// 1-based position in the descending-ratio ordering.
    pub rank: usize,
}

/// Discover up to `top_n` communities overlapping the seed, descending by
/// ratio. Provider failures surface as errors here; the pipeline treats
/// them as non-fatal and proceeds with the seed community alone.
pub async fn discover(
    provider: &dyn CommunityStatsProvider,
    seed: &str,
    top_n: usize,
) -> Result<Vec<CommunityOverlapScore>, CollectError> {
    let global = with_retry("stats global histogram", || provider.global_histogram()).await?;
    let conditioned =
        with_retry("stats seed histogram", || provider.seed_histogram(seed)).await?;

    let global_total: u64 = global.values().sum();
    let conditioned_total: u64 = conditioned.values().sum();
    if global_total == 0 || conditioned_total == 0 {
        debug!(seed = seed, "Empty histogram, no overlap candidates");
        return Ok(Vec::new());
    }

    // Score every conditioned community with a meaningful global baseline.
    let mut scored: Vec<(String, f64)> = conditioned
        .iter()
        .filter_map(|(id, &count)| {
            let global_prob = *global.get(id)? as f64 / global_total as f64;
            if global_prob < GLOBAL_PROBABILITY_EPSILON {
                return None;
            }
            let conditioned_prob = count as f64 / conditioned_total as f64;
            Some((id.clone(), conditioned_prob / global_prob))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_n);

    if scored.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = scored.iter().map(|(id, _)| id.clone()).collect();
    let names = with_retry("stats name resolution", || provider.resolve_names(&ids)).await?;

    let results: Vec<CommunityOverlapScore> = scored
        .iter()
        .zip(names)
        .enumerate()
        .map(|(i, ((_, ratio), name))| CommunityOverlapScore {
            community: name,
            ratio: *ratio,
            rank: i + 1,
        })
        .collect();

    info!(
        seed = seed,
        candidates = results.len(),
        top = results.first().map(|s| s.community.as_str()).unwrap_or("-"),
        "Overlap discovery complete"
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Canned histograms standing in for the stats service.
    struct FakeStats {
        global: HashMap<String, u64>,
        conditioned: HashMap<String, u64>,
        fail: bool,
    }

    #[async_trait]
    impl CommunityStatsProvider for FakeStats {
        async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError> {
            if self.fail {
                return Err(CollectError::transient("stats", "down"));
            }
            Ok(self.global.clone())
        }

        async fn seed_histogram(&self, _seed: &str) -> Result<HashMap<String, u64>, CollectError> {
            Ok(self.conditioned.clone())
        }

        async fn resolve_names(&self, ids: &[String]) -> Result<Vec<String>, CollectError> {
            // Names are just the ids with a prefix, preserving order.
            Ok(ids.iter().map(|id| format!("r_{id}")).collect())
        }
    }

    fn hist(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[tokio::test]
    async fn ranks_by_descending_ratio() {
        // Global: a=50%, b=25%, c=25%. Conditioned: a=20%, b=40%, c=40%.
        // Ratios: a=0.4, b=1.6, c=1.6 — b and c tie above a.
        let stats = FakeStats {
            global: hist(&[("a", 5000), ("b", 2500), ("c", 2500)]),
            conditioned: hist(&[("a", 20), ("b", 40), ("c", 40)]),
            fail: false,
        };

        let scores = discover(&stats, "seed", 10).await.unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores[0].ratio >= scores[1].ratio);
        assert!(scores[1].ratio >= scores[2].ratio);
        assert_eq!(scores[2].community, "r_a");
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[2].rank, 3);
    }

    #[tokio::test]
    async fn truncates_to_top_n() {
        let stats = FakeStats {
            global: hist(&[("a", 300), ("b", 300), ("c", 300), ("d", 100)]),
            conditioned: hist(&[("a", 10), ("b", 20), ("c", 30), ("d", 40)]),
            fail: false,
        };
        let scores = discover(&stats, "seed", 2).await.unwrap();
        assert_eq!(scores.len(), 2);
    }

    #[tokio::test]
    async fn skips_below_epsilon_baselines() {
        // "rare" has a vanishing global share and must not be scored even
        // though its conditioned share is enormous.
        let mut global = hist(&[("common", 1_000_000)]);
        global.insert("rare".to_string(), 1);
        let stats = FakeStats {
            global,
            conditioned: hist(&[("common", 50), ("rare", 50)]),
            fail: false,
        };

        let scores = discover(&stats, "seed", 10).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].community, "r_common");
    }

    /// Fails the global histogram a set number of times, then recovers.
    struct FlakyStats {
        inner: FakeStats,
        failures_left: std::sync::atomic::AtomicU32,
    }

    #[async_trait]
    impl CommunityStatsProvider for FlakyStats {
        async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError> {
            use std::sync::atomic::Ordering;
            if self.failures_left.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                n.checked_sub(1)
            }).is_ok()
            {
                return Err(CollectError::transient("stats", "flaky"));
            }
            self.inner.global_histogram().await
        }

        async fn seed_histogram(&self, seed: &str) -> Result<HashMap<String, u64>, CollectError> {
            self.inner.seed_histogram(seed).await
        }

        async fn resolve_names(&self, ids: &[String]) -> Result<Vec<String>, CollectError> {
            self.inner.resolve_names(ids).await
        }
    }

    #[tokio::test]
    async fn transient_provider_failure_is_retried() {
        let stats = FlakyStats {
            inner: FakeStats {
                global: hist(&[("a", 600), ("b", 400)]),
                conditioned: hist(&[("a", 10), ("b", 90)]),
                fail: false,
            },
            failures_left: std::sync::atomic::AtomicU32::new(1),
        };

        let scores = discover(&stats, "seed", 10).await.unwrap();
        assert_eq!(scores.len(), 2);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error() {
        let stats = FakeStats {
            global: HashMap::new(),
            conditioned: HashMap::new(),
            fail: true,
        };
        assert!(discover(&stats, "seed", 10).await.is_err());
    }

    #[tokio::test]
    async fn ratios_are_non_negative() {
        let stats = FakeStats {
            global: hist(&[("a", 500), ("b", 500)]),
            conditioned: hist(&[("a", 1), ("b", 99)]),
            fail: false,
        };
        let scores = discover(&stats, "seed", 10).await.unwrap();
        assert!(scores.iter().all(|s| s.ratio >= 0.0));
    }
}
