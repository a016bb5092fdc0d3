use std::io;
use std::path::{Component, Path, PathBuf};

use phono_crawler::sanitize_name;
use phono_scraper::Category;
use tokio::fs;

use crate::config::PipelineConfig;
use crate::error::Error;

/// Output tree of a run:
///
/// ```text
/// <root>/
///   <errorLog>
///   <manifest>
///   <result>/<category>/<transcription>/<name>.<ext>
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    result: PathBuf,
    manifest: PathBuf,
    error_log: PathBuf,
    prefix: String,
}

impl OutputLayout {
    pub fn new(config: &PipelineConfig) -> Self {
        let root = config.output_dir.clone();
        let prefix = config.asset_prefix.clone().unwrap_or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Self {
            result: root.join(&config.result_dir),
            manifest: root.join(&config.manifest_file),
            error_log: root.join(&config.error_log_file),
            root,
            prefix,
        }
    }

    pub fn result_dir(&self) -> &Path {
        &self.result
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    pub fn error_log_path(&self) -> &Path {
        &self.error_log
    }

    /// Creates the root and result directories, wiping the root first when
    /// `clean` is set.
    pub async fn prepare(&self, clean: bool) -> Result<(), Error> {
        if clean {
            match fs::remove_dir_all(&self.root).await {
                Ok(()) => log::info!("Removed previous output {}", self.root.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => (),
                Err(e) => return Err(Error::io(&self.root, e)),
            }
        }
        fs::create_dir_all(&self.result)
            .await
            .map_err(|e| Error::io(&self.result, e))
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.result.join(category.as_str())
    }

    pub fn sound_dir(&self, category: Category, transcription: &str) -> PathBuf {
        self.category_dir(category).join(sanitize_name(transcription))
    }

    pub async fn create_dir(&self, dir: &Path) -> Result<(), Error> {
        fs::create_dir_all(dir).await.map_err(|e| Error::io(dir, e))
    }

    /// Manifest form of a file under the root: the asset prefix followed by
    /// the path relative to the root, `/` separated.
    pub fn asset_ref(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let segments = relative.components().filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        });

        let mut reference = self.prefix.clone();
        for segment in segments {
            if !reference.is_empty() {
                reference.push('/');
            }
            reference.push_str(&segment);
        }
        reference
    }

    /// Drops everything downloaded so far, used when the run can't proceed.
    pub async fn discard_results(&self) {
        match fs::remove_dir_all(&self.result).await {
            Ok(()) => log::info!("Removed partial output {}", self.result.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (),
            Err(e) => log::error!("Couldn't remove {}: {e}", self.result.display()),
        }
    }
}
