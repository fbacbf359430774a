use std::path::PathBuf;

/// How the numeric tail of a product id is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdSuffix {
    /// First six hex digits of the SHA-256 of the canonical product URL.
    #[default]
    Hash,
    /// Uniform random integer in `0..1000`.
    Random,
}

impl std::fmt::Display for IdSuffix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdSuffix::Hash => write!(f, "hash"),
            IdSuffix::Random => write!(f, "random"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub firecrawl_api_key: Option<String>,
    pub scrape_api_url: String,
    pub log_level: String,
    pub catalog_path: PathBuf,
    pub images_dir: PathBuf,
    pub image_url_prefix: String,
    pub seeds_path: PathBuf,
    pub affiliate_id: Option<String>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub inter_request_delay_ms: u64,
    pub rate_limit_delay_secs: u64,
    pub scraper_max_attempts: u32,
    pub item_limit: usize,
    pub min_image_bytes: u64,
    pub id_suffix: IdSuffix,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "firecrawl_api_key",
                &self.firecrawl_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("scrape_api_url", &self.scrape_api_url)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("images_dir", &self.images_dir)
            .field("image_url_prefix", &self.image_url_prefix)
            .field("seeds_path", &self.seeds_path)
            .field("affiliate_id", &self.affiliate_id)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("rate_limit_delay_secs", &self.rate_limit_delay_secs)
            .field("scraper_max_attempts", &self.scraper_max_attempts)
            .field("item_limit", &self.item_limit)
            .field("min_image_bytes", &self.min_image_bytes)
            .field("id_suffix", &self.id_suffix)
            .finish()
    }
}
