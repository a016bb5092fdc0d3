use std::path::PathBuf;

use phono_crawler::{CrawlerConfig, OnError};
use phono_scraper::PageTemplate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the sounds index, relative to `base_url`
    #[serde(default = "default_index_path")]
    pub index_path: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory under `output_dir` holding the downloaded media
    #[serde(default = "default_result_dir")]
    pub result_dir: String,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    #[serde(default = "default_error_log_file")]
    pub error_log_file: String,

    /// Leading segment of manifest asset paths, `output_dir`'s own name when
    /// unset
    #[serde(default)]
    pub asset_prefix: Option<String>,

    /// Wipe `output_dir` before running
    #[serde(default = "default_clean")]
    pub clean: bool,

    #[serde(default = "default_on_row_error")]
    pub on_row_error: OnError,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub template: PageTemplate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index_path: default_index_path(),
            output_dir: default_output_dir(),
            result_dir: default_result_dir(),
            manifest_file: default_manifest_file(),
            error_log_file: default_error_log_file(),
            asset_prefix: None,
            clean: default_clean(),
            on_row_error: default_on_row_error(),
            crawler: CrawlerConfig::default(),
            template: PageTemplate::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://pronuncian.com".into()
}

fn default_index_path() -> String {
    "/sounds".into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("AmericanSounds")
}

fn default_result_dir() -> String {
    "result".into()
}

fn default_manifest_file() -> String {
    "manifest.json".into()
}

fn default_error_log_file() -> String {
    "errors.log".into()
}

fn default_clean() -> bool {
    true
}

fn default_on_row_error() -> OnError {
    OnError::SkipAndLog
}
