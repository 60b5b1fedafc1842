//! Upstream headline providers.
//!
//! Each source is bound to one [`SourceId`] and returns at most
//! `headlines_per_source` validated records, or a [`FetchError`] when the
//! whole source is unusable. Individual bad entries are dropped silently.

mod feed;
mod hacker_news;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;
use crate::models::{HeadlineRecord, SourceId};

pub use feed::FeedSource;
pub use hacker_news::HackerNewsSource;

#[async_trait]
pub trait HeadlineSource: Send + Sync {
    fn id(&self) -> SourceId;

    async fn fetch(&self) -> Result<Vec<HeadlineRecord>, FetchError>;
}

/// Shared HTTP client for all sources.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("NewsBar/1.0 (Headline Ticker)")
        .build()
}
