mod asset;
mod config;
mod errlog;
mod error;
mod fanout;
mod fetch;
mod limiter;
mod retry;

pub use asset::{asset_path, file_format, sanitize_name, AssetStats, AssetStore};
pub use config::{CrawlerConfig, OnError, Throttle};
pub use errlog::{ErrorLog, ErrorSink};
pub use error::FetchError;
pub use fanout::{Fanout, FanoutReport};
pub use fetch::Fetcher;
pub use limiter::{Limiter, Permit};
pub use retry::{retry_rate_limited, RetryPolicy};

pub use url::Url;
