// Community statistics provider — occurrence histograms over communities.
//
// The concrete client talks to the subredditstats API: a global histogram
// of activity across all subreddits, a histogram conditioned on users of
// one subreddit, and an id -> name resolution endpoint. The trait exists
// so discovery can be tested against canned histograms.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::CollectError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of community occurrence counts, global and seed-conditioned.
#[async_trait]
pub trait CommunityStatsProvider: Send + Sync {
    /// Occurrence counts over all communities, keyed by opaque community id.
    async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError>;

    /// Occurrence counts over communities frequented by users of `seed`.
    async fn seed_histogram(&self, seed: &str) -> Result<HashMap<String, u64>, CollectError>;

    /// Resolve opaque community ids to display names, in input order.
    async fn resolve_names(&self, ids: &[String]) -> Result<Vec<String>, CollectError>;
}

/// HTTP client for the subredditstats overlap API.
pub struct SubredditStatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl SubredditStatsClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, CollectError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CollectError::transient("stats", e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CollectError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path = path, "Stats API GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| CollectError::from_reqwest("stats", e))?;

        if !response.status().is_success() {
            return Err(CollectError::from_status("stats", response.status()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CollectError::parse(format!("stats response: {e}")))
    }
}

#[async_trait]
impl CommunityStatsProvider for SubredditStatsClient {
    async fn global_histogram(&self) -> Result<HashMap<String, u64>, CollectError> {
        self.get_json("/api/globalSubredditsIdHist", &[]).await
    }

    async fn seed_histogram(&self, seed: &str) -> Result<HashMap<String, u64>, CollectError> {
        self.get_json(
            "/api/subredditNameToSubredditsHist",
            &[("subredditName", seed)],
        )
        .await
    }

    async fn resolve_names(&self, ids: &[String]) -> Result<Vec<String>, CollectError> {
        let url = format!("{}/api/specificSubredditIdsToNames", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "subredditIds": ids }))
            .send()
            .await
            .map_err(|e| CollectError::from_reqwest("stats", e))?;

        if !response.status().is_success() {
            return Err(CollectError::from_status("stats", response.status()));
        }

        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| CollectError::parse(format!("stats name resolution: {e}")))
    }
}
