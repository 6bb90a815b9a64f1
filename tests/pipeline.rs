// End-to-end pipeline tests with every external collaborator degraded
// or mocked: the "primary platform unreachable" scenario.
//
// The reddit client points at an unroutable local port, the stats
// provider fails outright, and the only secondary collector is scripted.
// The run must still succeed: empty primary harvest, empty bank, seed
// term propagated to the collector, best-effort corpus returned.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use magpie::config::RunConfig;
use magpie::error::CollectError;
use magpie::model::{DateWindow, PostRecord, QuotaSpec, SourceId};
use magpie::overlap::CommunityStatsProvider;
use magpie::pipeline::{run, PipelineDeps};
use magpie::reddit::RedditClient;
use magpie::sources::SourceCollector;

struct DownStats;

#[async_trait]
impl CommunityStatsProvider for DownStats {
    async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError> {
        Err(CollectError::transient("stats", "service unavailable"))
    }

    async fn seed_histogram(&self, _seed: &str) -> Result<HashMap<String, u64>, CollectError> {
        Err(CollectError::transient("stats", "service unavailable"))
    }

    async fn resolve_names(&self, _ids: &[String]) -> Result<Vec<String>, CollectError> {
        Err(CollectError::transient("stats", "service unavailable"))
    }
}

struct ScriptedCollector {
    batch: Vec<PostRecord>,
    seen_terms: Arc<Mutex<Vec<Vec<String>>>>,
}

#[async_trait]
impl SourceCollector for ScriptedCollector {
    fn id(&self) -> SourceId {
        SourceId::Quora
    }

    fn term_cap(&self) -> usize {
        5
    }

    async fn fetch(
        &self,
        terms: &[String],
        _window: DateWindow,
        _limit: usize,
    ) -> Result<Vec<PostRecord>, CollectError> {
        self.seen_terms.lock().unwrap().push(terms.to_vec());
        Ok(self.batch.clone())
    }
}

fn january() -> DateWindow {
    DateWindow::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap(),
    )
    .unwrap()
}

fn degraded_config() -> RunConfig {
    let mut config = RunConfig::for_seed("technology");
    config.window = january();
    config.sources = vec![SourceId::Quora];
    config
        .quotas
        .insert(SourceId::Quora, QuotaSpec::new(50, Duration::from_secs(10), false));
    // Keep the run snappy: one community's worth of combinations against
    // a closed port.
    config.primary_quota = 100;
    config.overlap_top_n = 3;
    config
}

fn degraded_deps(batch: Vec<PostRecord>) -> (PipelineDeps, Arc<Mutex<Vec<Vec<String>>>>) {
    let seen_terms: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
    let deps = PipelineDeps {
        stats: Box::new(DownStats),
        reddit: RedditClient::new("http://127.0.0.1:9", "magpie-test").unwrap(),
        collectors: vec![Box::new(ScriptedCollector {
            batch,
            seen_terms: Arc::clone(&seen_terms),
        })],
    };
    (deps, seen_terms)
}

#[tokio::test]
async fn unreachable_primary_degrades_to_seed_fallback() {
    let (deps, seen_terms) = degraded_deps(Vec::new());
    let config = degraded_config();
    let mut rng = StdRng::seed_from_u64(1);

    let result = run(&config, &deps, &mut rng).await.unwrap();

    // No primary posts, empty bank, but a successful (empty) run.
    assert_eq!(result.breakdown[&SourceId::Reddit], 0);
    assert!(result.bank.is_empty());
    assert!(result.overlaps.is_empty());

    // The collector was invoked with exactly the raw seed term.
    let calls = seen_terms.lock().unwrap();
    assert_eq!(*calls, vec![vec!["technology".to_string()]]);
}

#[tokio::test]
async fn secondary_posts_survive_a_dead_primary() {
    let batch: Vec<PostRecord> = (0..8)
        .map(|i| PostRecord {
            source: SourceId::Quora,
            title: format!("q{i}"),
            body: String::new(),
            author: String::new(),
            url: format!("https://quora.com/q/{i}"),
            score: 0,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            community: None,
        })
        .collect();

    let (deps, _) = degraded_deps(batch);
    let config = degraded_config();
    let mut rng = StdRng::seed_from_u64(1);

    let result = run(&config, &deps, &mut rng).await.unwrap();

    assert_eq!(result.posts.len(), 8);
    assert_eq!(result.breakdown[&SourceId::Quora], 8);
    assert!(result
        .posts
        .iter()
        .all(|p| config.window.contains(p.created_at)));
}

/// Stats provider with nothing to say: empty histograms, instant answers.
struct EmptyStats;

#[async_trait]
impl CommunityStatsProvider for EmptyStats {
    async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError> {
        Ok(HashMap::new())
    }

    async fn seed_histogram(&self, _seed: &str) -> Result<HashMap<String, u64>, CollectError> {
        Ok(HashMap::new())
    }

    async fn resolve_names(&self, _ids: &[String]) -> Result<Vec<String>, CollectError> {
        Ok(Vec::new())
    }
}

/// Accepts connections and never answers — a primary platform that hangs
/// rather than refusing outright.
async fn spawn_hung_server() -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _held_open = socket;
                tokio::time::sleep(Duration::from_secs(3600)).await;
            });
        }
    });
    addr
}

#[tokio::test]
async fn deadline_cuts_a_hung_primary_short() {
    let addr = spawn_hung_server().await;
    let seen_terms: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
    let deps = PipelineDeps {
        stats: Box::new(EmptyStats),
        reddit: RedditClient::new(&format!("http://{addr}"), "magpie-test").unwrap(),
        collectors: vec![Box::new(ScriptedCollector {
            batch: Vec::new(),
            seen_terms: Arc::clone(&seen_terms),
        })],
    };

    let mut config = degraded_config();
    config.deadline = Duration::from_secs(1);
    let mut rng = StdRng::seed_from_u64(1);

    // The run must come back promptly with whatever it has, not wait out
    // the hung listing fetches.
    let outcome = tokio::time::timeout(Duration::from_secs(10), run(&config, &deps, &mut rng)).await;

    let result = outcome.expect("run must honor its wall-clock deadline").unwrap();
    assert_eq!(result.breakdown[&SourceId::Reddit], 0);
}

#[tokio::test]
async fn invalid_configuration_aborts_before_any_call() {
    let (deps, seen_terms) = degraded_deps(Vec::new());
    let mut config = degraded_config();
    config.seed = String::new();
    let mut rng = StdRng::seed_from_u64(1);

    let err = run(&config, &deps, &mut rng).await.unwrap_err();
    assert!(matches!(err, CollectError::Configuration { .. }));
    assert!(seen_terms.lock().unwrap().is_empty());
}
