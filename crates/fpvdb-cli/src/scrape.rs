//! `scrape <url>`: one-off page retrieval for debugging extraction.

use fpvdb_core::AppConfig;
use fpvdb_scraper::{FirecrawlClient, PageSource};

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<FirecrawlClient> {
    Ok(FirecrawlClient::new(
        &config.scrape_api_url,
        config.firecrawl_api_key.as_deref(),
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?)
}

pub(crate) async fn run_scrape(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let page = client.scrape(url).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
