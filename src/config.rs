use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::CollectError;
use crate::hashtags::ExtractionMode;
use crate::model::{DateWindow, QuotaSpec, SourceId};

/// Default endpoint for Reddit's public JSON listings.
pub const DEFAULT_REDDIT_URL: &str = "https://www.reddit.com";

/// Default endpoint for the community overlap statistics service.
pub const DEFAULT_STATS_URL: &str = "https://subredditstats.com";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file is
/// loaded automatically at startup via dotenvy. Endpoints are overridable
/// so tests can point clients at a local server.
pub struct Config {
    /// YouTube Data API key — required only when the youtube source is enabled.
    pub youtube_api_key: String,
    pub reddit_url: String,
    pub stats_url: String,
    pub youtube_url: String,
    pub search_url: String,
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Self {
        Self {
            youtube_api_key: env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            reddit_url: env::var("MAGPIE_REDDIT_URL")
                .unwrap_or_else(|_| DEFAULT_REDDIT_URL.to_string()),
            stats_url: env::var("MAGPIE_STATS_URL")
                .unwrap_or_else(|_| DEFAULT_STATS_URL.to_string()),
            youtube_url: env::var("MAGPIE_YOUTUBE_URL")
                .unwrap_or_else(|_| crate::sources::youtube::DEFAULT_API_URL.to_string()),
            search_url: env::var("MAGPIE_SEARCH_URL")
                .unwrap_or_else(|_| crate::sources::search::DEFAULT_SEARCH_URL.to_string()),
            user_agent: env::var("MAGPIE_USER_AGENT")
                .unwrap_or_else(|_| "magpie/0.1 (discourse aggregation)".to_string()),
        }
    }

    /// Check that the YouTube API key is configured.
    /// Call this before enabling the youtube collector.
    pub fn require_youtube(&self) -> Result<(), CollectError> {
        if self.youtube_api_key.is_empty() {
            return Err(CollectError::AuthRequired {
                platform: "youtube".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything one aggregation run needs, validated once before the run.
/// Every knob has exactly one home.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Seed community / query term (a subreddit name).
    pub seed: String,
    /// Secondary sources to fan out to.
    pub sources: Vec<SourceId>,
    /// Absolute date range every emitted post must fall in.
    pub window: DateWindow,
    /// Per-source quotas; sources not present fall back to defaults.
    pub quotas: HashMap<SourceId, QuotaSpec>,
    /// Total primary-platform post target, distributed across communities.
    pub primary_quota: usize,
    /// How many overlapping communities to discover beyond the seed.
    pub overlap_top_n: usize,
    /// Cap on the derived hashtag bank.
    pub max_terms: usize,
    /// Which term extraction strategy to run.
    pub extraction: ExtractionMode,
    /// Overall wall-clock budget for the run.
    pub deadline: Duration,
    /// Concurrent strategy/window fetches within the primary harvester.
    pub parallelism: usize,
}

impl RunConfig {
    /// Sensible defaults around a seed term: all secondary sources, the
    /// past week, 1000 primary posts, 19 overlap communities (20 total
    /// with the seed), a 100-term bank.
    pub fn for_seed(seed: impl Into<String>) -> Self {
        let mut quotas = HashMap::new();
        for source in SourceId::SECONDARY {
            quotas.insert(source, QuotaSpec::default_for(source));
        }
        Self {
            seed: seed.into(),
            sources: SourceId::SECONDARY.to_vec(),
            window: DateWindow::last_days(7),
            quotas,
            primary_quota: 1000,
            overlap_top_n: 19,
            max_terms: 100,
            extraction: ExtractionMode::WeightedTerms,
            deadline: Duration::from_secs(600),
            parallelism: 4,
        }
    }

    /// Validate the run configuration. Fatal on failure — nothing has
    /// touched the network yet.
    pub fn validate(&self) -> Result<(), CollectError> {
        if self.seed.trim().is_empty() {
            return Err(CollectError::Configuration {
                message: "seed term must not be empty".to_string(),
            });
        }
        if self.window.begin > self.window.end {
            return Err(CollectError::Configuration {
                message: "date window begin is after end".to_string(),
            });
        }
        if self.max_terms == 0 {
            return Err(CollectError::Configuration {
                message: "max_terms must be at least 1".to_string(),
            });
        }
        if self.parallelism == 0 {
            return Err(CollectError::Configuration {
                message: "parallelism must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The quota for a source, falling back to its default.
    pub fn quota_for(&self, source: SourceId) -> QuotaSpec {
        self.quotas
            .get(&source)
            .copied()
            .unwrap_or_else(|| QuotaSpec::default_for(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_config_is_valid() {
        assert!(RunConfig::for_seed("technology").validate().is_ok());
    }

    #[test]
    fn empty_seed_is_fatal() {
        let config = RunConfig::for_seed("   ");
        assert!(matches!(
            config.validate(),
            Err(CollectError::Configuration { .. })
        ));
    }

    #[test]
    fn zero_terms_is_fatal() {
        let mut config = RunConfig::for_seed("technology");
        config.max_terms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn quota_falls_back_to_default() {
        let config = RunConfig::for_seed("technology");
        let quota = config.quota_for(SourceId::YouTube);
        assert!(quota.hard_cap);
    }
}
