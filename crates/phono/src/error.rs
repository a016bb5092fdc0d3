use std::io;
use std::path::PathBuf;

use phono_crawler::FetchError;
use phono_scraper::{Category, ExtractError};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("index {url} is unavailable: {source}")]
    IndexUnavailable {
        url: Url,
        #[source]
        source: FetchError,
    },

    #[error("index {url} doesn't match the page template: {source}")]
    IndexStructure {
        url: Url,
        #[source]
        source: ExtractError,
    },

    /// Two rows claimed the same transcription, the index layout drifted.
    #[error("transcription {transcription} listed twice (again under {category})")]
    DuplicateTranscription {
        transcription: String,
        category: Category,
    },

    #[error("sound {sound}: {source}")]
    Row {
        sound: String,
        #[source]
        source: Box<Error>,
    },

    #[error("{count} {category} rows failed")]
    RowsFailed { category: Category, count: usize },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL `{url}`: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
