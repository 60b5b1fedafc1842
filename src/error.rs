use thiserror::Error;

use crate::models::SourceId;

/// Why a single entry was dropped. Never surfaced past a source fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejected {
    #[error("entry has an empty title")]
    EmptyTitle,
    #[error("entry link is not a valid URL: {0:?}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for FetchFailure {
    fn from(err: serde_json::Error) -> Self {
        FetchFailure::Decode(err.to_string())
    }
}

impl From<feed_rs::parser::ParseFeedError> for FetchFailure {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        FetchFailure::Decode(err.to_string())
    }
}

/// Whole-source failure. The aggregator absorbs it.
#[derive(Debug, Error)]
#[error("{source_id} fetch failed: {cause}")]
pub struct FetchError {
    pub source_id: SourceId,
    #[source]
    pub cause: FetchFailure,
}

impl FetchError {
    pub fn new(source_id: SourceId, cause: impl Into<FetchFailure>) -> Self {
        Self {
            source_id,
            cause: cause.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self.cause, FetchFailure::Transport(_))
    }
}
