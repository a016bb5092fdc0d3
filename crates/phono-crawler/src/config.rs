use std::cmp;
use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per request timeout, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    #[serde(default = "default_throttle")]
    pub throttle: Option<Throttle>,

    /// Maximum number of sound rows processed concurrently
    #[serde(default = "default_page_workers")]
    pub page_workers: usize,

    /// Maximum number of asset downloads in flight for one page
    #[serde(default = "default_asset_workers")]
    pub asset_workers: usize,

    /// Attempts made for a request answered with HTTP 429
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Pause before retrying a rate limited request, in seconds
    #[serde(default = "default_rate_limit_backoff")]
    pub rate_limit_backoff: f32,

    /// Ceiling for a single fan-out stage, in seconds
    #[serde(default = "default_max_wait")]
    pub max_wait: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
            throttle: default_throttle(),
            page_workers: default_page_workers(),
            asset_workers: default_asset_workers(),
            max_attempts: default_max_attempts(),
            rate_limit_backoff: default_rate_limit_backoff(),
            max_wait: default_max_wait(),
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        secs_f32(self.rate_limit_backoff)
    }
}

pub(crate) fn secs_f32(secs: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f32(secs)
    } else {
        Duration::ZERO
    }
}

fn default_user_agent() -> String {
    format!("phono/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    60
}

fn default_throttle() -> Option<Throttle> {
    Some(Throttle::default())
}

fn default_page_workers() -> usize {
    cmp::max(1, num_cpus::get().saturating_sub(2))
}

fn default_asset_workers() -> usize {
    8
}

fn default_max_attempts() -> usize {
    2
}

fn default_rate_limit_backoff() -> f32 {
    10.0
}

fn default_max_wait() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    Fail,
    SkipAndLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Throttle {
    /// The maximum number of concurrent requests
    Concurrent(NonZeroUsize),
    /// The number of requests per second
    PerSecond(NonZeroUsize),
    /// The delay in seconds between requests
    Delay(f32),
}

impl Default for Throttle {
    fn default() -> Self {
        Self::Concurrent(NonZeroUsize::new(8).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let conf: CrawlerConfig =
            serde_yaml::from_str("userAgent: test-agent\nmaxAttempts: 3\n").unwrap();

        assert_eq!("test-agent", conf.user_agent);
        assert_eq!(3, conf.max_attempts);
        assert_eq!(Some(Throttle::default()), conf.throttle);
        assert_eq!(Duration::from_secs(1800), conf.max_wait());
        assert!(conf.page_workers >= 1);
    }

    #[test]
    fn throttle_variants_deserialize() {
        let conf: CrawlerConfig = serde_yaml::from_str("throttle: !PerSecond 4\n").unwrap();
        assert_eq!(
            Some(Throttle::PerSecond(NonZeroUsize::new(4).unwrap())),
            conf.throttle
        );

        let conf: CrawlerConfig = serde_yaml::from_str("throttle: null\n").unwrap();
        assert_eq!(None, conf.throttle);
    }

    #[test]
    fn negative_backoff_is_clamped() {
        let conf = CrawlerConfig {
            rate_limit_backoff: -1.0,
            ..Default::default()
        };
        assert_eq!(Duration::ZERO, conf.rate_limit_backoff());
    }
}
