use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use futures::join;
use phono_crawler::{
    AssetStats, AssetStore, ErrorLog, ErrorSink, Fanout, FetchError, Fetcher, OnError,
};
use phono_scraper::{Category, CategorySection, IndexRow, PageExtractor};
use serde::Serialize;
use url::Url;

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::layout::OutputLayout;
use crate::manifest::ManifestWriter;
use crate::model::{PracticeWord, SoundEntry, SoundPracticeWords, SpellingWord};

/// Scrapes the whole index into the output tree and the manifest.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    index_url: Url,
    extractor: PageExtractor,
    layout: OutputLayout,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Sounds kept per category, in processing order
    pub sounds: Vec<(Category, usize)>,
    pub spelling_words: usize,
    pub practice_words: usize,
    pub failed_rows: usize,
    /// Row stages cut by the maximum wait. Word stages run inside a row
    /// under the same ceiling, so a hung word stage is cut with its row.
    pub timed_out_stages: usize,
    pub assets: AssetStats,
    pub elapsed: Duration,
    pub manifest: PathBuf,
}

impl RunSummary {
    pub fn total_sounds(&self) -> usize {
        self.sounds.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} sounds written to {} in {:.1?}",
            self.total_sounds(),
            self.manifest.display(),
            self.elapsed
        )?;
        for (category, count) in &self.sounds {
            writeln!(f, "  {category}: {count}")?;
        }
        writeln!(
            f,
            "words: {} spelling, {} practice",
            self.spelling_words, self.practice_words
        )?;
        writeln!(
            f,
            "assets: {} downloaded, {} already present, {} retried, {} failed",
            self.assets.downloaded, self.assets.skipped, self.assets.retried, self.assets.failed
        )?;
        write!(f, "failed rows: {}", self.failed_rows)?;
        if self.timed_out_stages > 0 {
            write!(f, ", timed out stages: {}", self.timed_out_stages)?;
        }
        Ok(())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url).map_err(|source| Error::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let index_url = base.join(&config.index_path).map_err(|source| Error::BaseUrl {
            url: format!("{}{}", config.base_url, config.index_path),
            source,
        })?;

        Ok(Self {
            extractor: PageExtractor::new(&config.template)?,
            layout: OutputLayout::new(&config),
            index_url,
            config,
        })
    }

    pub async fn run(&self) -> Result<RunSummary, Error> {
        let started = Instant::now();
        self.layout.prepare(self.config.clean).await?;

        let error_log = ErrorLog::open(self.layout.error_log_path())
            .map_err(|e| Error::io(self.layout.error_log_path(), e))?;
        let res = self.crawl(error_log.sink(), started).await;

        if let Err(e) = error_log.close() {
            log::error!("Couldn't flush the error log: {e}");
        }
        res
    }

    async fn crawl(&self, errors: ErrorSink, started: Instant) -> Result<RunSummary, Error> {
        let crawler = &self.config.crawler;
        let fetcher = Fetcher::new(crawler)?;
        let run = Run {
            pipeline: self,
            assets: AssetStore::new(fetcher.clone(), errors.clone()),
            words: Fanout::new(crawler.asset_workers, crawler.max_wait(), errors.clone()),
            fetcher,
        };
        let rows = Fanout::new(crawler.page_workers, crawler.max_wait(), errors.clone());

        log::info!("Fetching index {}", self.index_url);
        let sections = match run.index().await {
            Ok(sections) => sections,
            Err(e) => {
                log::error!("{e}");
                errors.record(format!("index: {e}"));
                self.layout.discard_results().await;
                return Err(e);
            }
        };

        let mut claimed = HashSet::new();
        let mut entries = Vec::new();
        let mut sounds = Vec::new();
        let mut failed_rows = 0;
        let mut timed_out_stages = 0;

        for section in sections {
            let category = section.category;
            self.layout
                .create_dir(&self.layout.category_dir(category))
                .await?;

            let mut failed = 0;
            let mut pending = Vec::new();
            for (i, row) in section.rows.into_iter().enumerate() {
                let row = match row {
                    Ok(row) => row,
                    Err(e) => {
                        failed += 1;
                        log::error!("Skipping {category} row #{i}: {e}");
                        errors.record(format!("{category} row #{i}: {e}"));
                        continue;
                    }
                };
                if !claimed.insert(row.transcription.clone()) {
                    failed += 1;
                    let e = Error::DuplicateTranscription {
                        transcription: row.transcription,
                        category,
                    };
                    log::error!("Skipping {category} row #{i}: {e}");
                    errors.record(format!("{category} row #{i}: {e}"));
                    continue;
                }
                pending.push((i, row));
            }

            log::info!("Processing {} {category} sounds", pending.len());
            let run = &run;
            let report = rows
                .run_all(
                    &format!("{category} rows"),
                    pending.into_iter().map(|(i, row)| async move {
                        run.sound(category, row).await.map(|entry| (i, entry))
                    }),
                )
                .await;

            failed += report.failed;
            if report.timed_out {
                timed_out_stages += 1;
            }
            let mut done = report.completed;
            done.sort_by_key(|(i, _)| *i);
            sounds.push((category, done.len()));
            entries.extend(done.into_iter().map(|(_, entry)| entry));

            failed_rows += failed;
            if failed > 0 && self.config.on_row_error == OnError::Fail {
                return Err(Error::RowsFailed {
                    category,
                    count: failed,
                });
            }
        }

        let manifest = ManifestWriter::new(self.layout.manifest_path());
        manifest.write(&entries)?;

        Ok(RunSummary {
            sounds,
            spelling_words: entries.iter().map(|e| e.spelling_words.len()).sum(),
            practice_words: entries.iter().map(|e| e.practice_words.len()).sum(),
            failed_rows,
            timed_out_stages,
            assets: run.assets.stats(),
            elapsed: started.elapsed(),
            manifest: manifest.path().to_path_buf(),
        })
    }
}

/// Shared state of one run.
struct Run<'a> {
    pipeline: &'a Pipeline,
    fetcher: Fetcher,
    assets: AssetStore,
    words: Fanout,
}

impl Run<'_> {
    async fn index(&self) -> Result<Vec<CategorySection>, Error> {
        let url = &self.pipeline.index_url;
        let page = self
            .fetcher
            .page(url)
            .await
            .map_err(|source| Error::IndexUnavailable {
                url: url.clone(),
                source,
            })?;
        self.pipeline
            .extractor
            .index(&page, url)
            .map_err(|source| Error::IndexStructure {
                url: url.clone(),
                source,
            })
    }

    async fn sound(&self, category: Category, row: IndexRow) -> Result<SoundEntry, Error> {
        let sound = row.transcription.clone();
        self.assemble(category, row)
            .await
            .map_err(|source| Error::Row {
                sound,
                source: Box::new(source),
            })
    }

    async fn assemble(&self, category: Category, row: IndexRow) -> Result<SoundEntry, Error> {
        let layout = &self.pipeline.layout;
        let extractor = &self.pipeline.extractor;
        let sound = row.transcription.as_str();
        let dir = layout.sound_dir(category, sound);
        layout.create_dir(&dir).await?;

        log::debug!("{sound}: fetching pronunciation");
        let page = self.fetcher.page(&row.pronunciation_url).await?;
        log::debug!("{sound}: extracting pronunciation");
        let media = extractor.pronunciation(&page, &row.pronunciation_url)?;
        log::debug!("{sound}: downloading pronunciation");
        let (photo, audio) = join!(
            self.assets.fetch_asset(&media.image_url, &dir, sound),
            self.assets.fetch_asset(&media.audio_url, &dir, sound)
        );

        log::debug!("{sound}: fetching spelling");
        let page = self.fetcher.page(&row.spelling_url).await?;
        log::debug!("{sound}: extracting spelling");
        let items = extractor.spelling(&page, &row.spelling_url)?;
        log::debug!("{sound}: downloading {} spelling words", items.len());
        let spelling_words = self
            .words
            .run_all(
                &format!("{sound} spelling"),
                items.into_iter().map(|item| {
                    let dir = &dir;
                    async move {
                        let audio = self
                            .assets
                            .fetch_asset(&item.audio_url, dir, &item.word)
                            .await;
                        Ok::<_, Infallible>(SpellingWord {
                            name: item.word,
                            audio_path: self.asset_ref(audio),
                            transcription: item.transcription,
                            sound: sound.to_string(),
                        })
                    }
                }),
            )
            .await
            .completed;

        log::debug!("{sound}: fetching practice");
        let page = self.fetcher.page(&row.practice_url).await?;
        log::debug!("{sound}: extracting practice");
        let items = extractor.practice(&page, &row.practice_url)?;
        log::debug!("{sound}: downloading {} practice words", items.len());
        let practice_words = self
            .words
            .run_all(
                &format!("{sound} practice"),
                items.into_iter().map(|item| {
                    let dir = &dir;
                    async move {
                        let audio = self
                            .assets
                            .fetch_asset(&item.audio_url, dir, &item.word)
                            .await;
                        Ok::<_, Infallible>(PracticeWord {
                            name: item.word,
                            audio_path: self.asset_ref(audio),
                            position: item.position,
                            sound: sound.to_string(),
                        })
                    }
                }),
            )
            .await
            .completed
            .into_iter()
            .collect::<SoundPracticeWords>();

        log::debug!("{sound}: assembled");
        Ok(SoundEntry {
            transcription: row.transcription.clone(),
            name: row.name,
            description: String::new(),
            photo_path: self.asset_ref(photo),
            audio_path: self.asset_ref(audio),
            category,
            spelling_words,
            practice_words,
        })
    }

    /// Missing media degrades to an empty path, the failure is already
    /// logged by the asset store.
    fn asset_ref(&self, res: Result<PathBuf, FetchError>) -> String {
        res.map(|path| self.pipeline.layout.asset_ref(&path))
            .unwrap_or_default()
    }
}
