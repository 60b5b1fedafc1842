use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::error::RecordRejected;

/// Upstream headline providers, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    Bbc,
    HackerNews,
}

impl SourceId {
    pub const ALL: [SourceId; 2] = [SourceId::Bbc, SourceId::HackerNews];

    pub fn display_name(self) -> &'static str {
        match self {
            SourceId::Bbc => "BBC News",
            SourceId::HackerNews => "Hacker News",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single validated headline. The title is trimmed and never empty, and
/// the URL is always absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineRecord {
    title: String,
    url: Url,
    source: SourceId,
}

impl HeadlineRecord {
    pub fn new(title: &str, link: &str, source: SourceId) -> Result<Self, RecordRejected> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RecordRejected::EmptyTitle);
        }

        let link = link.trim();
        let url = Url::parse(link).map_err(|_| RecordRejected::InvalidUrl(link.to_string()))?;

        Ok(Self {
            title: title.to_string(),
            url,
            source,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn source(&self) -> SourceId {
        self.source
    }
}

/// Output of one aggregation run. Records are grouped by source in
/// declaration order.
#[derive(Debug, Clone)]
pub struct AggregatedResult {
    pub headlines: Vec<HeadlineRecord>,
    pub completed_at: DateTime<Utc>,
}

impl AggregatedResult {
    pub fn new(headlines: Vec<HeadlineRecord>) -> Self {
        Self {
            headlines,
            completed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    pub fn titles(&self) -> HashSet<String> {
        title_set(&self.headlines)
    }
}

pub fn title_set(headlines: &[HeadlineRecord]) -> HashSet<String> {
    headlines.iter().map(|h| h.title().to_string()).collect()
}
