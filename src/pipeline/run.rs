// End-to-end aggregation run.
//
// seed -> overlap discovery -> community harvests -> term bank ->
// secondary fan-out -> merged corpus. Every stage after validation is
// best-effort: a failed stats provider leaves the seed as the only
// community, an unreachable primary platform leaves an empty bank (the
// fan-out falls back to the seed term), and the wall-clock deadline cuts
// the run short with whatever has been merged so far.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::error::CollectError;
use crate::hashtags::{self, HashtagBank};
use crate::model::{DedupIndex, PostRecord, SourceId};
use crate::overlap::{self, CommunityOverlapScore, CommunityStatsProvider};
use crate::pipeline::fanout;
use crate::reddit::{self, RedditClient};
use crate::sources::SourceCollector;

/// Minimum primary posts requested per community, regardless of how many
/// communities the quota is spread across.
const MIN_POSTS_PER_COMMUNITY: usize = 50;

/// External collaborators one run needs.
pub struct PipelineDeps {
    pub stats: Box<dyn CommunityStatsProvider>,
    pub reddit: RedditClient,
    pub collectors: Vec<Box<dyn SourceCollector>>,
}

/// The handoff artifact: merged corpus, derived bank, per-source counts,
/// and the overlap table that drove the harvest.
#[derive(Debug, Serialize)]
pub struct AggregateRun {
    pub posts: Vec<PostRecord>,
    pub bank: HashtagBank,
    pub breakdown: HashMap<SourceId, usize>,
    pub overlaps: Vec<CommunityOverlapScore>,
}

/// Tracks the run's wall-clock budget.
struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    fn expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Execute one aggregation run. Only configuration problems are fatal;
/// everything else degrades the corpus rather than the run.
pub async fn run(
    config: &RunConfig,
    deps: &PipelineDeps,
    rng: &mut StdRng,
) -> Result<AggregateRun, CollectError> {
    config.validate()?;
    let deadline = Deadline::new(config.deadline);

    // Step 1: expand the seed into overlapping communities. Non-fatal —
    // the seed alone is a valid community set.
    let overlaps = match overlap::discover(deps.stats.as_ref(), &config.seed, config.overlap_top_n)
        .await
    {
        Ok(scores) => scores,
        Err(err) => {
            warn!(error = %err, "Overlap discovery unavailable, using seed only");
            Vec::new()
        }
    };

    let mut communities: Vec<String> = vec![config.seed.clone()];
    communities.extend(overlaps.iter().map(|s| s.community.clone()));

    // Step 2: harvest the primary platform across all communities through
    // one shared dedup index.
    let mut dedup = DedupIndex::new();
    let mut primary: Vec<PostRecord> = Vec::new();
    let per_community = (config.primary_quota / communities.len().max(1))
        .max(MIN_POSTS_PER_COMMUNITY);

    let pb = ProgressBar::new(communities.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Harvest [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for community in &communities {
        if primary.len() >= config.primary_quota || deadline.expired() {
            break;
        }
        let quota = per_community.min(config.primary_quota - primary.len());
        // The deadline bounds in-flight work too: an expired timeout drops
        // this community's fetches and the run proceeds with what it has.
        let batch = tokio::time::timeout(
            deadline.remaining(),
            reddit::harvest(
                &deps.reddit,
                community,
                config.window,
                quota,
                &mut dedup,
                config.parallelism,
            ),
        )
        .await;
        match batch {
            Ok(batch) => primary.extend(batch),
            Err(_) => {
                warn!(
                    community = community.as_str(),
                    "Harvest deadline expired, keeping partial corpus"
                );
                break;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        posts = primary.len(),
        communities = communities.len(),
        "Primary harvest complete"
    );

    // Step 3: derive the term bank. Empty primary output is fine — the
    // fan-out falls back to the seed term.
    let bank = hashtags::extract(config.extraction, &primary, &communities, config.max_terms);
    if bank.is_empty() {
        info!(seed = %config.seed, "Empty term bank, fan-out will use the seed term");
    }

    // Step 4: fan out to the secondary sources.
    let fanout::FanoutResult {
        posts: secondary,
        mut breakdown,
    } = fanout::fanout(
        &deps.collectors,
        &bank,
        config,
        &mut dedup,
        rng,
        deadline.remaining(),
    )
    .await;

    // Step 5: merge. Primary posts were deduplicated on insert.
    breakdown.insert(SourceId::Reddit, primary.len());
    let mut posts = primary;
    posts.extend(secondary);

    info!(total = posts.len(), "Aggregation run complete");

    Ok(AggregateRun {
        posts,
        bank,
        breakdown,
        overlaps,
    })
}
