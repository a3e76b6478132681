use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RawEvent;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a JSON array of events, found {0}")]
    NotASequence(&'static str),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Producer of complete event lists. A list is delivered whole or not at all.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn load_events(&self) -> SourceResult<Vec<RawEvent>>;

    /// Human-readable origin, shown in the status bar.
    fn describe(&self) -> String;
}
