mod enrich;
mod images;
mod ingest;
mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::enrich::EnrichArgs;
use crate::images::ImagesCommands;
use crate::ingest::IngestArgs;

#[derive(Debug, Parser)]
#[command(name = "fpvdb-cli")]
#[command(about = "FPV parts catalog ingestion and maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the configured seeds and append new products to the catalog
    Ingest(IngestArgs),
    /// Fetch one page through the retrieval service and print it as JSON
    Scrape {
        /// Page URL to retrieve
        url: String,
    },
    /// Apply configured hazard levels and dossiers to stored products by name
    Enrich(EnrichArgs),
    #[command(flatten)]
    Images(ImagesCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = fpvdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Ingest(args)) => ingest::run_ingest(&config, &args).await?,
        Some(Commands::Scrape { url }) => scrape::run_scrape(&config, &url).await?,
        Some(Commands::Enrich(args)) => enrich::run_enrich(&config, &args)?,
        Some(Commands::Images(command)) => images::run(&config, command).await?,
        None => println!("fpvdb-cli ready; run with --help for commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
