use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("couldn't build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network failure on {url}: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("rate limited on {url} (HTTP 429)")]
    RateLimited { url: Url },

    #[error("{url} answered HTTP {status}")]
    Status { url: Url, status: StatusCode },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
