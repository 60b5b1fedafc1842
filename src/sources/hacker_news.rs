use anyhow::Context;
use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use super::HeadlineSource;
use crate::error::{FetchError, FetchFailure};
use crate::models::{HeadlineRecord, SourceId};

#[derive(Debug, Deserialize)]
struct HnItem {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Index + detail source: one request for the ranked id list, then one
/// request per surviving id.
pub struct HackerNewsSource {
    client: Client,
    index_url: String,
    item_base_url: String,
    limit: usize,
}

impl HackerNewsSource {
    pub fn new(
        client: Client,
        index_url: impl Into<String>,
        item_base_url: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            client,
            index_url: index_url.into(),
            item_base_url: item_base_url.into(),
            limit,
        }
    }

    pub fn item_url(&self, id: u64) -> String {
        format!("{}/{}.json", self.item_base_url.trim_end_matches('/'), id)
    }

    /// Discussion page used when a story has no (usable) external link.
    pub fn fallback_url(id: u64) -> String {
        format!("https://news.ycombinator.com/item?id={}", id)
    }

    async fn fetch_ids(&self) -> Result<Vec<u64>, FetchFailure> {
        let response = self
            .client
            .get(&self.index_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        let mut ids: Vec<u64> = serde_json::from_slice(&bytes)?;
        ids.truncate(self.limit);
        Ok(ids)
    }

    async fn fetch_item(&self, id: u64) -> anyhow::Result<HeadlineRecord> {
        let bytes = self
            .client
            .get(self.item_url(id))
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let item: HnItem = serde_json::from_slice(&bytes).context("malformed item")?;

        let link = item
            .url
            .filter(|u| Url::parse(u.trim()).is_ok())
            .unwrap_or_else(|| Self::fallback_url(item.id));
        let title = item.title.unwrap_or_default();

        Ok(HeadlineRecord::new(&title, &link, SourceId::HackerNews)?)
    }

    async fn fetch_headlines(&self) -> Result<Vec<HeadlineRecord>, FetchFailure> {
        info!("Fetching {} ({})", SourceId::HackerNews, self.index_url);

        let ids = self.fetch_ids().await?;

        // join_all keeps index order regardless of completion order
        let results = join_all(ids.iter().map(|&id| self.fetch_item(id))).await;

        let headlines = ids
            .into_iter()
            .zip(results)
            .filter_map(|(id, result)| match result {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(id, error = %e, "Dropping Hacker News item");
                    None
                }
            })
            .collect();

        Ok(headlines)
    }
}

#[async_trait]
impl HeadlineSource for HackerNewsSource {
    fn id(&self) -> SourceId {
        SourceId::HackerNews
    }

    async fn fetch(&self) -> Result<Vec<HeadlineRecord>, FetchError> {
        self.fetch_headlines()
            .await
            .map_err(|cause| FetchError::new(SourceId::HackerNews, cause))
    }
}
