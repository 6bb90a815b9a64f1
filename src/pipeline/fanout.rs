// Fan-out orchestration: the term bank goes out to every secondary
// collector, each in its own failure domain.
//
// Collectors run concurrently with private result lists; a single
// consumer merges them — window filter, dedup against the run's shared
// index, quota sampling — one source at a time. An error or timeout in
// one source contributes zero posts and never blocks the others.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::{with_retry, CollectError};
use crate::hashtags::HashtagBank;
use crate::model::{DedupIndex, PostRecord, SourceId};
use crate::pipeline::sampling;
use crate::sources::SourceCollector;

/// Merged secondary-source output plus the per-source contribution counts.
#[derive(Debug, Default)]
pub struct FanoutResult {
    pub posts: Vec<PostRecord>,
    pub breakdown: HashMap<SourceId, usize>,
}

/// Distribute the term bank (or the raw seed on an empty bank) to every
/// collector and merge the results under quotas.
pub async fn fanout(
    collectors: &[Box<dyn SourceCollector>],
    bank: &HashtagBank,
    config: &RunConfig,
    dedup: &mut DedupIndex,
    rng: &mut StdRng,
    remaining: Duration,
) -> FanoutResult {
    let mut result = FanoutResult::default();
    if collectors.is_empty() || remaining.is_zero() {
        return result;
    }

    let mut outcomes = stream::iter(collectors.iter().map(|collector| {
        // Empty bank -> the raw seed is the sole propagation term.
        let terms: Vec<String> = if bank.is_empty() {
            vec![config.seed.clone()]
        } else {
            bank.top_terms(collector.term_cap())
        };

        let quota = config.quota_for(collector.id());
        let budget = quota.time_budget.min(remaining);
        let window = config.window;

        async move {
            let source = collector.id();
            let fetched = tokio::time::timeout(
                budget,
                with_retry(&source.to_string(), || {
                    collector.fetch(&terms, window, quota.max_posts.saturating_mul(3))
                }),
            )
            .await;
            (source, quota, fetched)
        }
    }))
    .buffer_unordered(collectors.len());

    while let Some((source, quota, fetched)) = outcomes.next().await {
        let raw = match fetched {
            Ok(Ok(raw)) => raw,
            Ok(Err(err @ CollectError::AuthRequired { .. })) => {
                warn!(source = %source, error = %err, "Credentials missing, skipping source");
                result.breakdown.insert(source, 0);
                continue;
            }
            Ok(Err(err)) => {
                warn!(source = %source, error = %err, "Source failed, contributing zero posts");
                result.breakdown.insert(source, 0);
                continue;
            }
            Err(_) => {
                warn!(source = %source, "Source timed out, contributing zero posts");
                result.breakdown.insert(source, 0);
                continue;
            }
        };

        // Window filter + run-wide dedup before the quota applies.
        let unique: Vec<PostRecord> = raw
            .into_iter()
            .filter(|record| config.window.contains(record.created_at))
            .filter(|record| dedup.insert(&record.canonical_id()))
            .collect();

        let sampled = sampling::sample(unique, &quota, rng);

        info!(
            source = %source,
            kept = sampled.len(),
            "Source merged"
        );
        result.breakdown.insert(source, sampled.len());
        result.posts.extend(sampled);
    }

    result
}
