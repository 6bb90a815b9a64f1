// Reddit public JSON client — unauthenticated listing retrieval.
//
// Every subreddit listing (top/controversial/rising) is available as
// public JSON at /r/<name>/<listing>.json. A page holds at most 100
// items; deeper fetches follow the `after` fullname cursor. No OAuth
// handshake — a descriptive user agent is all the public endpoints ask for.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::CollectError;
use crate::model::post::clean_text;
use crate::model::{PostRecord, SourceId};
use crate::reddit::harvest::{RetrievalStrategy, TimeFilter};

/// Listing page size cap imposed by Reddit.
pub const PAGE_SIZE: usize = 100;

/// Per-request timeout; a hung listing must not stall the whole harvest.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin reqwest wrapper over Reddit's public JSON listings.
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, CollectError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CollectError::transient("reddit", e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one listing page for a subreddit.
    async fn fetch_page(
        &self,
        community: &str,
        strategy: RetrievalStrategy,
        time_filter: TimeFilter,
        limit: usize,
        after: Option<&str>,
    ) -> Result<ListingPage, CollectError> {
        let url = format!(
            "{}/r/{}/{}.json",
            self.base_url,
            community,
            strategy.as_str()
        );

        let limit_str = limit.min(PAGE_SIZE).to_string();
        let mut params: Vec<(&str, &str)> = vec![("limit", &limit_str), ("raw_json", "1")];
        // Rising has no time axis; top and controversial take `t`.
        if strategy.takes_time_filter() {
            params.push(("t", time_filter.as_str()));
        }
        if let Some(cursor) = after {
            params.push(("after", cursor));
        }

        debug!(
            community = community,
            strategy = strategy.as_str(),
            time_filter = time_filter.as_str(),
            "Reddit listing GET"
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CollectError::from_reqwest("reddit", e))?;

        if !response.status().is_success() {
            return Err(CollectError::from_status("reddit", response.status()));
        }

        let listing: ListingResponse = response
            .json()
            .await
            .map_err(|e| CollectError::parse(format!("reddit listing: {e}")))?;

        Ok(listing.data)
    }

    /// Fetch up to `fetch_limit` posts from one strategy/time-filter
    /// combination, following pagination. Individual malformed items are
    /// skipped; the page that contained them still contributes the rest.
    pub async fn fetch_listing(
        &self,
        community: &str,
        strategy: RetrievalStrategy,
        time_filter: TimeFilter,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, CollectError> {
        let mut records = Vec::new();
        let mut after: Option<String> = None;

        while records.len() < fetch_limit {
            let remaining = fetch_limit - records.len();
            let page = self
                .fetch_page(community, strategy, time_filter, remaining, after.as_deref())
                .await?;

            if page.children.is_empty() {
                break;
            }

            for child in &page.children {
                if records.len() >= fetch_limit {
                    break;
                }
                match child.data.to_record(community) {
                    Ok(record) => records.push(record),
                    Err(err) => {
                        debug!(error = %err, "Skipping malformed reddit item");
                    }
                }
            }

            after = page.after;
            if after.is_none() {
                break;
            }
        }

        Ok(records)
    }
}

// -- Serde types for the public listing JSON --

#[derive(Debug, Deserialize)]
struct ListingResponse {
    data: ListingPage,
}

#[derive(Debug, Deserialize)]
struct ListingPage {
    children: Vec<ListingChild>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

/// The subset of listing fields the pipeline uses.
#[derive(Debug, Deserialize)]
struct RawPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    permalink: String,
    #[serde(default)]
    score: i64,
    created_utc: Option<f64>,
}

impl RawPost {
    fn to_record(&self, community: &str) -> Result<PostRecord, CollectError> {
        let created = self
            .created_utc
            .and_then(|secs| Utc.timestamp_opt(secs as i64, 0).single())
            .ok_or_else(|| CollectError::parse("missing or invalid created_utc"))?;

        Ok(PostRecord {
            source: SourceId::Reddit,
            title: clean_text(&self.title),
            body: clean_text(&self.selftext),
            author: self
                .author
                .clone()
                .unwrap_or_else(|| "[deleted]".to_string()),
            url: format!("https://reddit.com{}", self.permalink),
            score: self.score,
            created_at: created,
            community: Some(community.to_string()),
        })
    }
}
