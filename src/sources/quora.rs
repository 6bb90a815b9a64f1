// Quora collector — top questions approximated via site search.

use async_trait::async_trait;
use tracing::info;

use crate::config::Config;
use crate::error::CollectError;
use crate::model::{DateWindow, PostRecord, SourceId};
use crate::sources::search::SiteSearchClient;
use crate::sources::SourceCollector;

pub struct QuoraCollector {
    search: SiteSearchClient,
}

impl QuoraCollector {
    pub fn new(config: &Config) -> Result<Self, CollectError> {
        Ok(Self {
            search: SiteSearchClient::new(&config.search_url, &config.user_agent)?,
        })
    }
}

#[async_trait]
impl SourceCollector for QuoraCollector {
    fn id(&self) -> SourceId {
        SourceId::Quora
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
                .search_site("www.quora.com", term, window, remaining, SourceId::Quora)
                .await?;
            posts.extend(batch);
        }
        info!(posts = posts.len(), "Quora collection complete");
        Ok(posts)
    }
}
