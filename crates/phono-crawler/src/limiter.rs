use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::{secs_f32, Throttle};

/// Shared gate every outgoing request goes through.
///
/// Cloning a `Limiter` shares its permits, so nested fan-outs cannot multiply
/// the load put on the remote site.
#[derive(Debug, Clone)]
pub struct Limiter {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    Unlimited,
    Concurrent(Arc<Semaphore>),
    PerSecond(RateLimiter),
    Delay {
        interval: Duration,
        next: Arc<Mutex<Instant>>,
    },
}

/// Held for the lifetime of a request.
#[derive(Debug)]
pub struct Permit {
    _permit: Option<OwnedSemaphorePermit>,
}

impl Limiter {
    /// Must be called from within a tokio runtime when `throttle` is `PerSecond`.
    pub fn new(throttle: Option<Throttle>) -> Self {
        let kind = match throttle {
            None => Kind::Unlimited,
            Some(Throttle::Concurrent(n)) => Kind::Concurrent(Arc::new(Semaphore::new(n.get()))),
            Some(Throttle::PerSecond(n)) => Kind::PerSecond(RateLimiter::new(n.get())),
            Some(Throttle::Delay(secs)) => Kind::Delay {
                interval: secs_f32(secs),
                next: Arc::new(Mutex::new(Instant::now())),
            },
        };
        Self { kind }
    }

    pub async fn acquire(&self) -> Permit {
        match &self.kind {
            Kind::Unlimited => Permit { _permit: None },
            Kind::Concurrent(permits) => Permit {
                _permit: permits.clone().acquire_owned().await.ok(),
            },
            Kind::PerSecond(limiter) => {
                limiter.acquire().await;
                Permit { _permit: None }
            }
            Kind::Delay { interval, next } => {
                let wait = {
                    let mut next = next.lock().await;
                    let now = Instant::now();
                    let start = (*next).max(now);
                    *next = start + *interval;
                    start - now
                };
                if !wait.is_zero() {
                    time::sleep(wait).await;
                }
                Permit { _permit: None }
            }
        }
    }
}

/// Permit pool topped up to `per_second` once every second.
#[derive(Debug, Clone)]
struct RateLimiter {
    inner: Arc<RateInner>,
}

#[derive(Debug)]
struct RateInner {
    permits: Arc<Semaphore>,
    refill: JoinHandle<()>,
}

impl Drop for RateInner {
    fn drop(&mut self) {
        self.refill.abort();
    }
}

impl RateLimiter {
    fn new(per_second: usize) -> Self {
        let permits = Arc::new(Semaphore::new(per_second));

        let permits_c = permits.clone();
        let refill = tokio::spawn(async move {
            let mut ticks = time::interval(Duration::from_secs(1));
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let available = permits_c.available_permits();
                permits_c.add_permits(per_second.saturating_sub(available));
            }
        });

        Self {
            inner: Arc::new(RateInner { permits, refill }),
        }
    }

    async fn acquire(&self) {
        if let Ok(permit) = self.inner.permits.clone().acquire_owned().await {
            permit.forget();
        }
    }
}
