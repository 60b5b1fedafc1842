use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, info};

use super::HeadlineSource;
use crate::error::{FetchError, FetchFailure};
use crate::models::{HeadlineRecord, SourceId};

/// RSS/Atom document source.
pub struct FeedSource {
    id: SourceId,
    client: Client,
    url: String,
    limit: usize,
}

impl FeedSource {
    pub fn new(id: SourceId, client: Client, url: impl Into<String>, limit: usize) -> Self {
        Self {
            id,
            client,
            url: url.into(),
            limit,
        }
    }

    /// Parse a feed document into at most `limit` records, in document order.
    pub fn parse_headlines(
        bytes: &[u8],
        source: SourceId,
        limit: usize,
    ) -> Result<Vec<HeadlineRecord>, FetchFailure> {
        let parsed = parser::parse(bytes)?;

        let headlines = parsed
            .entries
            .into_iter()
            .filter_map(|entry| {
                let title = entry.title.map(|t| t.content).unwrap_or_default();
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();

                match HeadlineRecord::new(&title, &link, source) {
                    Ok(record) => Some(record),
                    Err(reason) => {
                        debug!(source = %source, %reason, "Dropping feed entry");
                        None
                    }
                }
            })
            .take(limit)
            .collect();

        Ok(headlines)
    }

    async fn fetch_headlines(&self) -> Result<Vec<HeadlineRecord>, FetchFailure> {
        info!("Fetching feed: {} ({})", self.id, self.url);

        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let (source, limit) = (self.id, self.limit);
        tokio::task::spawn_blocking(move || Self::parse_headlines(&bytes, source, limit))
            .await
            .map_err(|e| FetchFailure::Decode(format!("feed parse task failed: {}", e)))?
    }
}

#[async_trait]
impl HeadlineSource for FeedSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch(&self) -> Result<Vec<HeadlineRecord>, FetchError> {
        self.fetch_headlines()
            .await
            .map_err(|cause| FetchError::new(self.id, cause))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rss(items: &[(&str, &str)]) -> String {
        let body: String = items
            .iter()
            .map(|(title, link)| {
                format!(
                    "<item><title>{}</title><link>{}</link></item>",
                    title, link
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>BBC News</title>
                    <link>https://www.bbc.co.uk/news</link>
                    <description>Top stories</description>
                    {}
                </channel>
            </rss>"#,
            body
        )
    }

    mod parse_headlines_tests {
        use super::*;

        #[test]
        fn test_parse_keeps_document_order() {
            let xml = rss(&[
                ("First story", "https://www.bbc.co.uk/news/1"),
                ("Second story", "https://www.bbc.co.uk/news/2"),
                ("Third story", "https://www.bbc.co.uk/news/3"),
            ]);

            let result = FeedSource::parse_headlines(xml.as_bytes(), SourceId::Bbc, 5).unwrap();

            let titles: Vec<&str> = result.iter().map(|h| h.title()).collect();
            assert_eq!(titles, vec!["First story", "Second story", "Third story"]);
            assert_eq!(result[1].url().as_str(), "https://www.bbc.co.uk/news/2");
            assert!(result.iter().all(|h| h.source() == SourceId::Bbc));
        }

        #[test]
        fn test_parse_truncates_to_limit() {
            let items: Vec<(String, String)> = (1..=8)
                .map(|i| (format!("Story {}", i), format!("https://www.bbc.co.uk/news/{}", i)))
                .collect();
            let refs: Vec<(&str, &str)> = items
                .iter()
                .map(|(t, l)| (t.as_str(), l.as_str()))
                .collect();
            let xml = rss(&refs);

            let result = FeedSource::parse_headlines(xml.as_bytes(), SourceId::Bbc, 5).unwrap();

            assert_eq!(result.len(), 5);
            assert_eq!(result[4].title(), "Story 5");
        }

        #[test]
        fn test_parse_drops_entries_without_title_or_link() {
            let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
                <rss version="2.0">
                    <channel>
                        <title>Feed</title>
                        <item><title>   </title><link>https://example.com/blank</link></item>
                        <item><title>No link</title></item>
                        <item><title>Kept</title><link>https://example.com/kept</link></item>
                    </channel>
                </rss>"#;

            let result = FeedSource::parse_headlines(xml.as_bytes(), SourceId::Bbc, 5).unwrap();

            assert_eq!(result.len(), 1);
            assert_eq!(result[0].title(), "Kept");
        }

        #[test]
        fn test_limit_counts_only_valid_entries() {
            let xml = rss(&[
                ("", "https://example.com/0"),
                ("One", "https://example.com/1"),
                ("Two", "https://example.com/2"),
            ]);

            let result = FeedSource::parse_headlines(xml.as_bytes(), SourceId::Bbc, 2).unwrap();

            let titles: Vec<&str> = result.iter().map(|h| h.title()).collect();
            assert_eq!(titles, vec!["One", "Two"]);
        }

        #[test]
        fn test_parse_malformed_document_is_decode_error() {
            let result = FeedSource::parse_headlines(b"not a feed at all", SourceId::Bbc, 5);
            assert!(matches!(result, Err(FetchFailure::Decode(_))));
        }

        #[test]
        fn test_parse_empty_channel() {
            let xml = rss(&[]);
            let result = FeedSource::parse_headlines(xml.as_bytes(), SourceId::Bbc, 5).unwrap();
            assert!(result.is_empty());
        }
    }
}
