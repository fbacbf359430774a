//! Catalog image maintenance: auditing references, localizing remote images
//! that predate archiving, and recovering broken ones from product pages.

mod hydrate;
mod localize;
mod verify;

use clap::Subcommand;
use fpvdb_core::{load_seeds, AppConfig};
use fpvdb_store::JsonFileStore;

use crate::images::hydrate::Hydrator;

#[derive(Debug, Subcommand)]
pub(crate) enum ImagesCommands {
    /// Report products whose image is missing, generic, or broken
    VerifyImages {
        /// Maximum concurrent HEAD requests when checking remote URLs
        #[arg(long, default_value_t = 8)]
        concurrency: usize,

        /// Also send a HEAD request to every remote image URL
        #[arg(long)]
        check_remote: bool,
    },
    /// Download remaining remote images and point products at the local copies
    LocalizeImages,
    /// Re-fetch product pages for missing, placeholder, or lost images
    HydrateImages,
}

pub(crate) async fn run(config: &AppConfig, command: ImagesCommands) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.catalog_path);
    match command {
        ImagesCommands::VerifyImages {
            concurrency,
            check_remote,
        } => verify::run_verify_images(config, &store, concurrency, check_remote).await,
        ImagesCommands::LocalizeImages => {
            let archiver = crate::ingest::build_archiver(config)?;
            let summary = localize::localize_images(&store, &archiver).await?;
            if summary.localized == 0 && summary.failed == 0 {
                println!("no remote images found to localize");
            } else {
                println!(
                    "localized {} image(s), {} failed",
                    summary.localized, summary.failed
                );
            }
            Ok(())
        }
        ImagesCommands::HydrateImages => {
            let seeds_file = load_seeds(&config.seeds_path)?;
            let client = crate::scrape::build_client(config)?;
            let archiver = crate::ingest::build_archiver(config)?;
            let summary = Hydrator {
                source: &client,
                store: &store,
                archiver: &archiver,
                retailer: &seeds_file.retailer,
                retry: crate::ingest::retry_policy(config),
                url_prefix: &config.image_url_prefix,
            }
            .run()
            .await?;
            println!(
                "recovered {} image(s), {} failed, {} without a product link",
                summary.hydrated, summary.failed, summary.no_link
            );
            Ok(())
        }
    }
}
