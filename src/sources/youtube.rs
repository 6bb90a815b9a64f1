// YouTube collector — Data API v3 search, the hard-cap source.
//
// Search results come back already ranked; the API caps a page at 50 and
// deep pagination burns quota fast, so this source is fetched as a small
// enumerated top-K and truncated rather than sampled downstream. Three
// order variants approximate "top" content: relevance first, then view
// count, then rating.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::CollectError;
use crate::model::post::clean_text;
use crate::model::{DateWindow, PostRecord, SourceId};
use crate::sources::SourceCollector;

use async_trait::async_trait;

/// Default YouTube Data API endpoint.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// API page size cap.
const PAGE_SIZE: usize = 50;

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

const ORDERS: [&str; 3] = ["relevance", "viewCount", "rating"];

pub struct YouTubeCollector {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeCollector {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CollectError::transient("youtube", e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.youtube_api_key.clone(),
            base_url: config.youtube_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search_page(
        &self,
        term: &str,
        order: &str,
        window: DateWindow,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchResponse, CollectError> {
        let url = format!("{}/search", self.base_url);
        let published_after = window.begin.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let published_before = window.end.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        let max_results = page_size.min(PAGE_SIZE).to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("q", term),
            ("type", "video"),
            ("maxResults", &max_results),
            ("key", &self.api_key),
            ("order", order),
            ("publishedAfter", &published_after),
            ("publishedBefore", &published_before),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        debug!(term = term, order = order, "YouTube search GET");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| CollectError::from_reqwest("youtube", e))?;

        if !response.status().is_success() {
            return Err(CollectError::from_status("youtube", response.status()));
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(|e| CollectError::parse(format!("youtube search: {e}")))
    }
}

#[async_trait]
impl SourceCollector for YouTubeCollector {
    fn id(&self) -> SourceId {
        SourceId::YouTube
    }

    fn term_cap(&self) -> usize {
        10
    }

    async fn fetch(
        &self,
        terms: &[String],
        window: DateWindow,
        limit: usize,
    ) -> Result<Vec<PostRecord>, CollectError> {
        if self.api_key.is_empty() {
            return Err(CollectError::AuthRequired {
                platform: "youtube".to_string(),
            });
        }

        let mut posts = Vec::new();

        'terms: for term in terms {
            for order in ORDERS {
                if posts.len() >= limit {
                    break 'terms;
                }

                let mut page_token: Option<String> = None;
                loop {
                    let remaining = limit - posts.len();
                    let page = self
                        .search_page(term, order, window, remaining, page_token.as_deref())
                        .await?;

                    for item in page.items {
                        if posts.len() >= limit {
                            break;
                        }
                        let Some(record) = item.to_record(window) else {
                            continue;
                        };
                        posts.push(record);
                    }

                    page_token = page.next_page_token;
                    if page_token.is_none() || posts.len() >= limit {
                        break;
                    }
                }
            }
        }

        info!(videos = posts.len(), "YouTube collection complete");
        Ok(posts)
    }
}

// -- Serde types for the search endpoint --

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: VideoId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

impl SearchItem {
    /// Convert to a PostRecord; returns None for channel results and
    /// items whose timestamp is missing or outside the window.
    fn to_record(&self, window: DateWindow) -> Option<PostRecord> {
        let video_id = self.id.video_id.as_deref()?;
        let published: DateTime<Utc> = self
            .snippet
            .published_at
            .parse::<DateTime<Utc>>()
            .ok()?;
        if !window.contains(published) {
            return None;
        }

        Some(PostRecord {
            source: SourceId::YouTube,
            title: clean_text(&self.snippet.title),
            body: clean_text(&self.snippet.description),
            author: self.snippet.channel_title.clone(),
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            score: 0,
            created_at: published,
            community: None,
        })
    }
}
