// Threads collector — authenticated-only platform, approximated via site
// search with a small term cap to keep the request fan-out modest.

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::CollectError;
use crate::model::{DateWindow, PostRecord, SourceId};
use crate::sources::search::SiteSearchClient;
use crate::sources::SourceCollector;

pub struct ThreadsCollector {
    search: SiteSearchClient,
}

impl ThreadsCollector {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        Ok(Self {
            search: SiteSearchClient::new(&config.search_url, &config.user_agent)?,
        })
    }
}

#[async_trait]
impl SourceCollector for ThreadsCollector {
    fn id(&self) -> SourceId {
        SourceId::Threads
    }

    fn term_cap(&self) -> usize {
        3
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
                .search_site("www.threads.net", term, window, remaining, SourceId::Threads)
                .await?;
            posts.extend(batch);
        }
        info!(posts = posts.len(), "Threads collection complete");
        Ok(posts)
    }
}
