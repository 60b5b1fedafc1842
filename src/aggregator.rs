use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::models::AggregatedResult;
use crate::sources::HeadlineSource;

/// Fans out to every source concurrently and concatenates the results in
/// declaration order. Never fails: a failing source contributes nothing.
pub struct Aggregator {
    sources: Vec<Arc<dyn HeadlineSource>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn HeadlineSource>>) -> Self {
        Self { sources }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub async fn fetch_all(&self) -> AggregatedResult {
        let fetches = self.sources.iter().map(|source| async move {
            match source.fetch().await {
                Ok(headlines) => headlines,
                Err(e) => {
                    warn!(
                        source = %e.source_id,
                        transport = e.is_transport(),
                        cause = %e.cause,
                        "Source fetch failed"
                    );
                    Vec::new()
                }
            }
        });

        let headlines: Vec<_> = join_all(fetches).await.into_iter().flatten().collect();
        info!(
            "Fetched {} headlines from {} sources",
            headlines.len(),
            self.sources.len()
        );

        AggregatedResult::new(headlines)
    }
}
