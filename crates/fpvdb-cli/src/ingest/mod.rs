//! `ingest` command: wires configuration, the retrieval client, the image
//! archiver and the JSON catalog into an [`IngestDriver`] run.

mod driver;

use std::time::Duration;

use clap::Args;
use fpvdb_core::{load_seeds, AppConfig, SeedFilter};
use fpvdb_scraper::{FetchOptions, ImageArchiver, RetryPolicy};
use fpvdb_store::{CatalogStore, JsonFileStore};

pub(crate) use driver::{DriverSettings, IngestDriver, IngestSummary};

#[derive(Debug, Args)]
pub(crate) struct IngestArgs {
    /// Stop after this many products have been added (overrides FPVDB_ITEM_LIMIT)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only crawl category listing seeds
    #[arg(long, conflicts_with = "searches_only")]
    pub categories_only: bool,

    /// Only run curated search seeds
    #[arg(long)]
    pub searches_only: bool,

    /// Print the resolved seeds and exit without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    fn seed_filter(&self) -> SeedFilter {
        if self.categories_only {
            SeedFilter::CategoriesOnly
        } else if self.searches_only {
            SeedFilter::SearchesOnly
        } else {
            SeedFilter::All
        }
    }
}

pub(crate) fn build_archiver(config: &AppConfig) -> anyhow::Result<ImageArchiver> {
    Ok(ImageArchiver::new(
        &config.images_dir,
        &config.image_url_prefix,
        config.min_image_bytes,
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?)
}

pub(crate) fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.scraper_max_attempts,
        Duration::from_secs(config.rate_limit_delay_secs),
    )
}

/// Runs one ingestion pass over the configured seeds.
///
/// # Errors
///
/// Returns an error if the seeds file is invalid, the retrieval client cannot
/// be built, or the catalog cannot be read or written. Per-link failures are
/// logged and counted, not returned.
pub(crate) async fn run_ingest(config: &AppConfig, args: &IngestArgs) -> anyhow::Result<()> {
    let seeds_file = load_seeds(&config.seeds_path)?;
    let seeds = seeds_file.seeds(args.seed_filter())?;
    let limit = args.limit.unwrap_or(config.item_limit);

    if args.dry_run {
        println!("[dry-run] {} seed(s), limit {limit}", seeds.len());
        for seed in &seeds {
            println!("  [{}] {} -> {}", seed.profile(), seed.label(), seed.url());
        }
        return Ok(());
    }

    let client = crate::scrape::build_client(config)?;
    let archiver = build_archiver(config)?;
    let store = JsonFileStore::new(&config.catalog_path);

    let starting = store.load()?.products.len();
    tracing::info!(
        catalog = %config.catalog_path.display(),
        products = starting,
        seeds = seeds.len(),
        limit,
        "starting ingestion"
    );

    let settings = DriverSettings {
        limit,
        inter_request_delay: Duration::from_millis(config.inter_request_delay_ms),
        fetch: FetchOptions {
            retailer: seeds_file.retailer.clone(),
            affiliate_id: config.affiliate_id.clone(),
            id_suffix: config.id_suffix,
            retry: retry_policy(config),
        },
    };

    let driver = IngestDriver::new(&client, &store, &archiver, settings);
    let summary = driver.run(&seeds).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &IngestSummary) {
    println!(
        "ingestion complete: {}/{} added, {} duplicate, {} rejected, {} failed, {} seed(s) failed",
        summary.added,
        summary.limit,
        summary.duplicates,
        summary.rejected,
        summary.failed,
        summary.failed_seeds
    );
    for (url, reason) in &summary.skipped {
        println!("  skipped {url}: {reason}");
    }
}
