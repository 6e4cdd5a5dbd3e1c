//! Command-line surface. Parsing only; every subcommand is a thin dispatch
//! into [`war_wikipedia::pipeline`].

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use reqwest::Client;
use tracing::info;

use war_wikipedia::categories::{
    CategoryCrawler, TWENTIETH_CENTURY_CATEGORY, TWENTY_FIRST_CENTURY_CATEGORY,
};
use war_wikipedia::dataset::DatasetLayout;
use war_wikipedia::pipeline;
use war_wikipedia::types::ScrapeError;
use war_wikipedia::wiki::WikiClient;

const USER_AGENT: &str = concat!("war-wikipedia/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Parser)]
#[command(
    name = "war-wikipedia",
    version,
    about = "Harvest Wikipedia conflict articles into title/section JSON documents."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the conflict category tree and cache the page ids
    CollectIds(CollectIdsArgs),
    /// Fetch raw content and info-boxes for the cached ids
    Harvest(HarvestArgs),
    /// Harvest wars named by "List of wars ..." era pages
    HarvestEras(HarvestErasArgs),
    /// Fetch pages listed in a PetScan manifest and write JSON documents
    FromManifest(FromManifestArgs),
    /// Convert saved raw content into JSON documents
    Finalize(FinalizeArgs),
}

#[derive(Debug, Args)]
struct CollectIdsArgs {
    /// Dataset directory; the id cache lands at <save-dir>/conflict_ids.txt
    #[arg(long, default_value = "data")]
    save_dir: PathBuf,
}

#[derive(Debug, Args)]
struct HarvestArgs {
    /// Dataset directory holding the id cache and receiving content/meta
    #[arg(long, default_value = "data")]
    save_dir: PathBuf,

    /// Harvest at most this many ids
    #[arg(long)]
    limit: Option<usize>,

    /// Pause between pages that hit the network, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
}

#[derive(Debug, Args)]
struct HarvestErasArgs {
    /// File listing era page ids, one per line (e.g. List_of_wars_1900-44)
    #[arg(long)]
    eras_path: PathBuf,

    /// Dataset directory receiving content/meta
    #[arg(long, default_value = "data")]
    save_dir: PathBuf,

    /// Pause between pages that hit the network, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
}

#[derive(Debug, Args)]
struct FromManifestArgs {
    /// PetScan JSON manifest listing page ids and titles
    #[arg(long)]
    manifest: PathBuf,

    /// Dataset directory receiving the JSON documents
    #[arg(long, default_value = "data")]
    save_dir: PathBuf,
}

#[derive(Debug, Args)]
struct FinalizeArgs {
    /// Dataset directory whose content/ files get JSON analogues
    #[arg(long, default_value = "data")]
    save_dir: PathBuf,
}

impl Cli {
    pub async fn run(self) -> Result<(), ScrapeError> {
        match self.command {
            Commands::CollectIds(args) => {
                let crawler = CategoryCrawler::new(http_client()?)?;
                let layout = DatasetLayout::new(&args.save_dir);
                let ids = pipeline::collect_conflict_ids(
                    &crawler,
                    &layout,
                    &[TWENTIETH_CENTURY_CATEGORY, TWENTY_FIRST_CENTURY_CATEGORY],
                )
                .await?;
                info!(count = ids.len(), cache = %layout.ids_file().display(), "conflict ids ready");
            }
            Commands::Harvest(args) => {
                let client = WikiClient::new(http_client()?)?;
                let layout = DatasetLayout::new(&args.save_dir);
                let ids = layout.load_ids().await?;
                let report = pipeline::harvest(
                    &client,
                    &layout,
                    &ids,
                    Duration::from_millis(args.delay_ms),
                    args.limit,
                )
                .await?;
                info!(
                    processed = report.processed,
                    skipped = report.skipped,
                    failed = report.failed,
                    infoboxes = report.infoboxes,
                    "harvest complete"
                );
            }
            Commands::HarvestEras(args) => {
                let client = WikiClient::new(http_client()?)?;
                let layout = DatasetLayout::new(&args.save_dir);
                let eras = read_lines(&args.eras_path).await?;
                let titles = pipeline::collect_war_titles(&client, &eras).await?;
                let report = pipeline::harvest(
                    &client,
                    &layout,
                    &titles,
                    Duration::from_millis(args.delay_ms),
                    None,
                )
                .await?;
                info!(
                    processed = report.processed,
                    skipped = report.skipped,
                    failed = report.failed,
                    infoboxes = report.infoboxes,
                    "era harvest complete"
                );
            }
            Commands::FromManifest(args) => {
                let client = WikiClient::new(http_client()?)?;
                let layout = DatasetLayout::new(&args.save_dir);
                let report = pipeline::from_manifest(&client, &layout, &args.manifest).await?;
                info!(
                    processed = report.processed,
                    skipped = report.skipped,
                    failed = report.failed,
                    "manifest run complete"
                );
            }
            Commands::Finalize(args) => {
                let layout = DatasetLayout::new(&args.save_dir);
                let converted = pipeline::finalize(&layout).await?;
                info!(converted, "finalize complete");
            }
        }
        Ok(())
    }
}

async fn read_lines(path: &std::path::Path) -> Result<Vec<String>, ScrapeError> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn http_client() -> Result<Client, ScrapeError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .use_rustls_tls()
        .build()?)
}
