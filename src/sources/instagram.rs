// Instagram collector — hashtag pages require a session and rate-limit
// anonymous clients aggressively, so top content is approximated via site
// search like Threads and Quora.

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::CollectError;
use crate::model::{DateWindow, PostRecord, SourceId};
use crate::sources::search::SiteSearchClient;
use crate::sources::SourceCollector;

pub struct InstagramCollector {
    search: SiteSearchClient,
}

impl InstagramCollector {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        Ok(Self {
            search: SiteSearchClient::new(&config.search_url, &config.user_agent)?,
        })
    }
}

#[async_trait]
impl SourceCollector for InstagramCollector {
    fn id(&self) -> SourceId {
        SourceId::Instagram
    }

    fn term_cap(&self) -> usize {
        5
    }

    async fn fetch(
        &self,
        terms: &[String],
        window: DateWindow,
        limit: usize,
    ) -> Result<Vec<PostRecord>, CollectError> {
        let mut posts = Vec::new();
        for term in terms {
            if posts.len() >= limit {
                break;
            }
            let remaining = limit - posts.len();
            let batch = self
                .search
                .search_site(
                    "www.instagram.com",
                    term,
                    window,
                    remaining,
                    SourceId::Instagram,
                )
                .await?;
            posts.extend(batch);
        }
        info!(posts = posts.len(), "Instagram collection complete");
        Ok(posts)
    }
}
