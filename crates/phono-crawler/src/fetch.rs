use reqwest::{Response, StatusCode};
use url::Url;

use crate::config::CrawlerConfig;
use crate::error::FetchError;
use crate::limiter::{Limiter, Permit};
use crate::retry::{retry_rate_limited, RetryPolicy};

/// HTTP access to the remote site, shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    limiter: Limiter,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            limiter: Limiter::new(config.throttle),
            retry: RetryPolicy::from(config),
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Downloads a document as text, retrying when rate limited.
    pub async fn page(&self, url: &Url) -> Result<String, FetchError> {
        retry_rate_limited(&self.retry, url, || self.text(url)).await
    }

    /// Downloads a raw body in a single attempt.
    pub async fn bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let (resp, _permit) = self.send(url).await?;
        let body = resp.bytes().await.map_err(|source| FetchError::Network {
            url: url.clone(),
            source,
        })?;
        Ok(body.to_vec())
    }

    async fn text(&self, url: &Url) -> Result<String, FetchError> {
        let (resp, _permit) = self.send(url).await?;
        resp.text().await.map_err(|source| FetchError::Network {
            url: url.clone(),
            source,
        })
    }

    async fn send(&self, url: &Url) -> Result<(Response, Permit), FetchError> {
        let permit = self.limiter.acquire().await;
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        match resp.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited { url: url.clone() }),
            status if !status.is_success() => Err(FetchError::Status {
                url: url.clone(),
                status,
            }),
            _ => Ok((resp, permit)),
        }
    }
}
