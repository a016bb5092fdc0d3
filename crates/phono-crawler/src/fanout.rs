use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::{future, stream, StreamExt};
use tokio::time::timeout;

use crate::errlog::ErrorSink;

/// Fork-join stage: runs independent tasks with bounded concurrency and
/// returns once all of them are done.
#[derive(Debug, Clone)]
pub struct Fanout {
    limit: usize,
    max_wait: Duration,
    errors: ErrorSink,
}

#[derive(Debug)]
pub struct FanoutReport<T> {
    /// Successful results, in completion order
    pub completed: Vec<T>,
    pub failed: usize,
    /// The stage hit `max_wait` and its unfinished tasks were dropped
    pub timed_out: bool,
}

impl Fanout {
    pub fn new(limit: usize, max_wait: Duration, errors: ErrorSink) -> Self {
        Self {
            limit: limit.max(1),
            max_wait,
            errors,
        }
    }

    /// Drives every task to completion. A failing task is logged and counted,
    /// it never stops its siblings.
    pub async fn run_all<I, F, T, E>(&self, stage: &str, tasks: I) -> FanoutReport<T>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut completed = Vec::new();
        let mut failed = 0;

        let drain = stream::iter(tasks)
            .buffer_unordered(self.limit)
            .for_each(|res| {
                match res {
                    Ok(item) => completed.push(item),
                    Err(e) => {
                        failed += 1;
                        log::warn!("{stage}: {e}");
                        self.errors.record(format!("{stage}: {e}"));
                    }
                }
                future::ready(())
            });
        let timed_out = timeout(self.max_wait, drain).await.is_err();

        if timed_out {
            log::error!("{stage}: gave up after {:?}", self.max_wait);
            self.errors
                .record(format!("{stage}: gave up after {:?}", self.max_wait));
        }

        FanoutReport {
            completed,
            failed,
            timed_out,
        }
    }
}
