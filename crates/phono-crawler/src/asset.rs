use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use url::Url;

use crate::errlog::ErrorSink;
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::retry::retry_rate_limited;

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Downloads named media files into target directories.
///
/// A file already present under the computed name is never downloaded again,
/// which keeps re-running a whole crawl after a partial failure cheap.
#[derive(Debug, Clone)]
pub struct AssetStore {
    fetcher: Fetcher,
    errors: ErrorSink,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    retried: AtomicUsize,
    failed: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssetStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub retried: usize,
    pub failed: usize,
}

impl AssetStore {
    pub fn new(fetcher: Fetcher, errors: ErrorSink) -> Self {
        Self {
            fetcher,
            errors,
            counters: Arc::default(),
        }
    }

    pub fn stats(&self) -> AssetStats {
        AssetStats {
            downloaded: self.counters.downloaded.load(Ordering::SeqCst),
            skipped: self.counters.skipped.load(Ordering::SeqCst),
            retried: self.counters.retried.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }

    /// Stores the body of `url` as `<target_dir>/<sanitized name>.<format>`.
    ///
    /// Failures are logged and recorded before being returned, callers only
    /// have to treat an error as missing media.
    pub async fn fetch_asset(
        &self,
        url: &Url,
        target_dir: &Path,
        name: &str,
    ) -> Result<PathBuf, FetchError> {
        let path = asset_path(url, target_dir, name);
        let present = fs::metadata(&path).await.map(|m| m.is_file());
        if present.unwrap_or(false) {
            log::debug!("Skipping {url}, {} already exists", path.display());
            self.counters.skipped.fetch_add(1, Ordering::SeqCst);
            return Ok(path);
        }

        let mut attempts: usize = 0;
        let res = retry_rate_limited(self.fetcher.retry_policy(), url, || {
            attempts += 1;
            self.fetcher.bytes(url)
        })
        .await;
        self.counters
            .retried
            .fetch_add(attempts.saturating_sub(1), Ordering::SeqCst);

        let res = match res {
            Ok(body) => write_file(&path, &body).await,
            Err(e) => Err(e),
        };

        match res {
            Ok(()) => {
                log::info!("Downloaded {name} from {url}");
                self.counters.downloaded.fetch_add(1, Ordering::SeqCst);
                Ok(path)
            }
            Err(e) => {
                log::warn!("Couldn't download {name}: {e}");
                self.errors.record(format!("asset {name}: {e}"));
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                Err(e)
            }
        }
    }
}

/// Writes `body` next to `path` first, so a failed write never leaves a file
/// under the final name.
async fn write_file(path: &Path, body: &[u8]) -> Result<(), FetchError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let part = path.with_file_name(format!(
        ".{file_name}.{}.part",
        PART_COUNTER.fetch_add(1, Ordering::SeqCst)
    ));

    if let Err(e) = fs::write(&part, body).await {
        fs::remove_file(&part).await.ok();
        return Err(FetchError::io(part, e));
    }
    if let Err(e) = fs::rename(&part, path).await {
        fs::remove_file(&part).await.ok();
        return Err(FetchError::io(path, e));
    }
    Ok(())
}

/// Path an asset named `name` downloaded from `url` is stored at.
pub fn asset_path(url: &Url, target_dir: &Path, name: &str) -> PathBuf {
    target_dir.join(format!("{}.{}", sanitize_name(name), file_format(url)))
}

/// Escapes path separators so free-text names stay inside their directory.
/// Escapes path separators and a leading `.`, so the name can neither leave
/// the target directory nor name it. An empty name becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    let name = name.replace('/', "%2f").replace('\\', "%5c");
    match name.strip_prefix('.') {
        Some(rest) => format!("%2e{rest}"),
        None if name.is_empty() => "_".into(),
        None => name,
    }
}

/// Extension of the last path segment of `url`, empty when there is none.
pub fn file_format(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    match segment.rfind('.') {
        Some(i) if i > 0 => segment[i + 1..].to_string(),
        _ => String::new(),
    }
}
