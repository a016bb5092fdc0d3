//! Scrapes the sounds of a pronunciation site into media files and a JSON
//! manifest for a mobile app.

mod config;
mod error;
mod layout;
mod manifest;
mod model;
mod pipeline;

pub use config::PipelineConfig;
pub use error::Error;
pub use layout::OutputLayout;
pub use manifest::ManifestWriter;
pub use model::{PracticeWord, SoundEntry, SoundPracticeWords, SpellingWord};
pub use pipeline::{Pipeline, RunSummary};

pub use phono_crawler::{CrawlerConfig, OnError, Throttle};
pub use phono_scraper::{Category, PageTemplate, SoundPosition};
