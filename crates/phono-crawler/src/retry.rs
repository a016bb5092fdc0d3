use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::config::CrawlerConfig;
use crate::error::FetchError;

/// Bounded retry applied to requests the remote site rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: usize,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for RetryPolicy {
    fn from(conf: &CrawlerConfig) -> Self {
        Self {
            max_attempts: conf.max_attempts.max(1),
            backoff: conf.rate_limit_backoff(),
        }
    }
}

/// Runs `operation` until it succeeds, fails with anything but
/// [`FetchError::RateLimited`], or `policy.max_attempts` is reached.
pub async fn retry_rate_limited<F, Fut, T>(
    policy: &RetryPolicy,
    url: &Url,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if e.is_rate_limited() && attempt < policy.max_attempts => {
                log::warn!(
                    "Rate limited on {url}, retrying in {:?} (attempt {attempt}/{})",
                    policy.backoff,
                    policy.max_attempts
                );
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            res => return res,
        }
    }
}
