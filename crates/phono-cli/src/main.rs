use std::fs::File;
use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use env_logger::Env;
use phono::{OnError, Pipeline, PipelineConfig};
use tokio::runtime;

const DEFAULT_LOG_FILTER: &str = "phono=info,phono_crawler=warn,phono_scraper=warn";

/// Scrape the sounds of pronuncian.com into media files and a JSON manifest
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<SubCommand>,
    /// Optional yaml configuration file
    #[arg(env = "PHONO_CONFIG", long)]
    pub config: Option<PathBuf>,
    /// Override the output root directory
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,
    /// Override the site's base URL
    #[arg(long)]
    pub base_url: Option<String>,
    /// Override the crawler's user agent
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Override the number of sound rows processed concurrently
    #[arg(long)]
    pub row_concurrency: Option<usize>,
    /// Override the number of asset downloads in flight per page
    #[arg(long)]
    pub asset_concurrency: Option<usize>,
    /// Override how failing sound rows are handled
    #[arg(value_enum, long)]
    pub on_row_error: Option<OnError>,
    /// Keep the previous output, already downloaded assets are reused
    #[arg(long)]
    pub keep_existing: bool,
    /// When quiet no logs are outputted
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[command(hide = true)]
    Completion,
}

impl TryFrom<&Args> for PipelineConfig {
    type Error = anyhow::Error;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.config.as_ref().map(File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            PipelineConfig::default()
        };
        if let Some(output_dir) = &args.output_dir {
            conf.output_dir = output_dir.clone();
        }
        if let Some(base_url) = &args.base_url {
            conf.base_url = base_url.to_string();
        }
        if let Some(user_agent) = &args.user_agent {
            conf.crawler.user_agent = user_agent.to_string();
        }
        if let Some(row_concurrency) = args.row_concurrency {
            conf.crawler.page_workers = row_concurrency;
        }
        if let Some(asset_concurrency) = args.asset_concurrency {
            conf.crawler.asset_workers = asset_concurrency;
        }
        if let Some(on_row_error) = args.on_row_error {
            conf.on_row_error = on_row_error;
        }
        if args.keep_existing {
            conf.clean = false;
        }
        Ok(conf)
    }
}

pub fn scrape(args: &Args) -> anyhow::Result<()> {
    let conf = PipelineConfig::try_from(args)?;
    let pipeline = Pipeline::new(conf)?;

    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    let summary = rt.block_on(pipeline.run())?;

    if !args.quiet {
        println!("{summary}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        Some(SubCommand::Completion) => {
            generate(Shell::Bash, &mut Args::command(), "phono", &mut io::stdout());
            Ok(())
        }
        None => {
            if !args.quiet {
                env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER))
                    .init();
            }
            scrape(&args)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("phono").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn no_arguments_is_a_full_default_run() {
        let args = Args {
            config: None,
            ..parse(&[])
        };
        let conf = PipelineConfig::try_from(&args).unwrap();

        assert!(conf.clean);
        assert_eq!(PathBuf::from("AmericanSounds"), conf.output_dir);
        assert_eq!(OnError::SkipAndLog, conf.on_row_error);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "outputDir: from-file\nbaseUrl: http://mirror.test\ncrawler:\n  assetWorkers: 2\n  maxAttempts: 5"
        )
        .unwrap();

        let args = parse(&[
            "--config",
            file.path().to_str().unwrap(),
            "--output-dir",
            "from-flag",
            "--row-concurrency",
            "3",
            "--on-row-error",
            "fail",
            "--keep-existing",
        ]);
        let conf = PipelineConfig::try_from(&args).unwrap();

        assert_eq!(PathBuf::from("from-flag"), conf.output_dir);
        assert_eq!("http://mirror.test", conf.base_url);
        assert_eq!(3, conf.crawler.page_workers);
        assert_eq!(2, conf.crawler.asset_workers);
        assert_eq!(5, conf.crawler.max_attempts);
        assert_eq!(OnError::Fail, conf.on_row_error);
        assert!(!conf.clean);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = parse(&["--config", "/nonexistent/phono.yaml"]);
        assert!(PipelineConfig::try_from(&args).is_err());
    }

    #[test]
    fn completion_is_a_subcommand() {
        assert!(matches!(parse(&["completion"]).cmd, Some(SubCommand::Completion)));
    }
}
