// Secondary source collectors behind one interface.
//
// Each platform adapter implements SourceCollector; the fan-out pipeline
// never sees platform specifics. Collectors must not fail on "zero
// results" — an error means a genuine failure (network, auth, parse).

pub mod instagram;
pub mod quora;
pub mod search;
pub mod threads;
pub mod youtube;

use async_trait::async_trait;
use tracing::warn;

use crate::config::Config;
use crate::error::CollectError;
use crate::model::{DateWindow, PostRecord, SourceId};

/// One platform's collector. `fetch` may over-return relative to `limit`
/// intent; the sampling policy applies the real quota afterwards.
#[async_trait]
pub trait SourceCollector: Send + Sync {
    fn id(&self) -> SourceId;

    /// How many search terms one fan-out invocation hands this collector.
    /// Bounds request fan-out per source.
    fn term_cap(&self) -> usize;

    async fn fetch(
        &self,
        terms: &[String],
        window: DateWindow,
        limit: usize,
    ) -> Result<Vec<PostRecord>, CollectError>;
}

/// Build collectors for the enabled sources. Collectors with missing
/// credentials are still constructed — they surface AuthRequired at fetch
/// time and the fan-out skips them, keeping the failure-domain handling
/// in one place.
pub fn build_collectors(
    config: &Config,
    sources: &[SourceId],
) -> Result<Vec<Box<dyn SourceCollector>>, CollectError> {
    let mut collectors: Vec<Box<dyn SourceCollector>> = Vec::new();
    for source in sources {
        match source {
            SourceId::YouTube => {
                if let Err(err) = config.require_youtube() {
                    warn!(error = %err, "YouTube enabled without an API key");
                }
                collectors.push(Box::new(youtube::YouTubeCollector::new(config)?));
            }
            SourceId::Quora => {
                collectors.push(Box::new(quora::QuoraCollector::new(config)?));
            }
            SourceId::Threads => {
                collectors.push(Box::new(threads::ThreadsCollector::new(config)?));
            }
            SourceId::Instagram => {
                collectors.push(Box::new(instagram::InstagramCollector::new(config)?));
            }
            SourceId::Reddit => {
                // Primary platform, harvested separately.
            }
        }
    }
    Ok(collectors)
}
