// Primary harvester: exhaustive strategy × time-filter enumeration.
//
// A single listing under-samples a subreddit's content graph — top-of-all-
// time misses recent discussion, rising misses the back catalog. The
// harvester enumerates every {time filter} × {retrieval strategy}
// combination, filters each batch to the run's date window, and merges
// through a shared dedup index until the quota is met or the cross-product
// is exhausted.
//
// Combinations fetch concurrently with private result lists; a single
// consumer loop performs the dedup-and-append merge, so the index never
// needs a lock.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::with_retry;
use crate::model::{DateWindow, DedupIndex, PostRecord};
use crate::reddit::client::RedditClient;

/// One way of ranking a subreddit's listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStrategy {
    Top,
    Controversial,
    Rising,
}

impl RetrievalStrategy {
    pub const ALL: [RetrievalStrategy; 3] = [
        RetrievalStrategy::Top,
        RetrievalStrategy::Controversial,
        RetrievalStrategy::Rising,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStrategy::Top => "top",
            RetrievalStrategy::Controversial => "controversial",
            RetrievalStrategy::Rising => "rising",
        }
    }

    /// Rising is a live listing with no historical axis.
    pub fn takes_time_filter(&self) -> bool {
        !matches!(self, RetrievalStrategy::Rising)
    }
}

/// Historical sub-window for ranked listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    All,
    Year,
    Month,
    Week,
    Day,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 5] = [
        TimeFilter::All,
        TimeFilter::Year,
        TimeFilter::Month,
        TimeFilter::Week,
        TimeFilter::Day,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::Year => "year",
            TimeFilter::Month => "month",
            TimeFilter::Week => "week",
            TimeFilter::Day => "day",
        }
    }
}

/// How many posts one combination asks the platform for. Broad listings
/// (top over long filters) get deep pagination; narrow ones a single page.
/// Tuning table, not contract — scaled to 100-per-page public listings.
fn fetch_budget(strategy: RetrievalStrategy, time_filter: TimeFilter, quota: usize) -> usize {
    let cap = match (strategy, time_filter) {
        (RetrievalStrategy::Top, TimeFilter::All) => 1000,
        (RetrievalStrategy::Top, TimeFilter::Year) => 500,
        (RetrievalStrategy::Top, TimeFilter::Month) => 250,
        (RetrievalStrategy::Top, _) => 100,
        _ => 100,
    };
    cap.min(quota.saturating_mul(3).max(100))
}

/// Harvest one community across the full strategy × time-filter
/// cross-product. Inserts into the shared `dedup` index; output carries no
/// duplicate canonical identities, every record inside `window`. Stops
/// early once `quota` records have been accepted.
///
/// Per-combination failures are logged and skipped. If every combination
/// fails (platform unreachable) the result is simply empty — the pipeline
/// falls back to the seed term downstream.
pub async fn harvest(
    client: &RedditClient,
    community: &str,
    window: DateWindow,
    quota: usize,
    dedup: &mut DedupIndex,
    parallelism: usize,
) -> Vec<PostRecord> {
    // Outer axis: time filter; inner: strategy. Rising appears once per
    // outer pass but only fetches on the first (it ignores the filter).
    let combinations: Vec<(RetrievalStrategy, TimeFilter)> = TimeFilter::ALL
        .iter()
        .flat_map(|&tf| {
            RetrievalStrategy::ALL.iter().filter_map(move |&st| {
                if !st.takes_time_filter() && tf != TimeFilter::All {
                    return None;
                }
                Some((st, tf))
            })
        })
        .collect();

    let mut accepted = Vec::new();

    // Each task fetches into a private list; results merge here, on the
    // consumer side of the stream, one combination at a time.
    let mut results = stream::iter(combinations.into_iter().map(|(strategy, time_filter)| {
        let budget = fetch_budget(strategy, time_filter, quota);
        async move {
            let outcome = with_retry("reddit listing", || {
                client.fetch_listing(community, strategy, time_filter, budget)
            })
            .await;
            (strategy, time_filter, outcome)
        }
    }))
    .buffer_unordered(parallelism.max(1));

    while let Some((strategy, time_filter, outcome)) = results.next().await {
        let batch = match outcome {
            Ok(batch) => batch,
            Err(err) => {
                warn!(
                    community = community,
                    strategy = strategy.as_str(),
                    time_filter = time_filter.as_str(),
                    error = %err,
                    "Combination failed, continuing with the rest"
                );
                continue;
            }
        };

        let mut kept = 0usize;
        for record in batch {
            if accepted.len() >= quota {
                break;
            }
            if !window.contains(record.created_at) {
                continue;
            }
            if !dedup.insert(&record.canonical_id()) {
                continue;
            }
            accepted.push(record);
            kept += 1;
        }

        debug!(
            community = community,
            strategy = strategy.as_str(),
            time_filter = time_filter.as_str(),
            kept = kept,
            total = accepted.len(),
            "Combination merged"
        );

        if accepted.len() >= quota {
            // Quota met — stop draining; in-flight fetches are dropped.
            break;
        }
    }

    info!(
        community = community,
        posts = accepted.len(),
        "Harvest complete"
    );

    accepted
}
