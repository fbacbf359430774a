use crate::app_config::{AppConfig, IdSuffix};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let firecrawl_api_key = optional("FIRECRAWL_API_KEY");
    let scrape_api_url = or_default("FPVDB_SCRAPE_API_URL", "https://api.firecrawl.dev");
    let log_level = or_default("FPVDB_LOG_LEVEL", "info");
    let catalog_path = PathBuf::from(or_default("FPVDB_CATALOG_PATH", "./src/data/products.json"));
    let images_dir = PathBuf::from(or_default("FPVDB_IMAGES_DIR", "./public/images/parts"));
    let image_url_prefix = or_default("FPVDB_IMAGE_URL_PREFIX", "/images/parts")
        .trim_end_matches('/')
        .to_string();
    let seeds_path = PathBuf::from(or_default("FPVDB_SEEDS_PATH", "./config/seeds.yaml"));
    let affiliate_id = optional("FPVDB_AFFILIATE_ID");

    let scraper_request_timeout_secs = parse_u64("FPVDB_SCRAPER_REQUEST_TIMEOUT_SECS", "60")?;
    let scraper_user_agent = or_default("FPVDB_SCRAPER_USER_AGENT", "fpvdb/0.1 (catalog-ingest)");
    let inter_request_delay_ms = parse_u64("FPVDB_INTER_REQUEST_DELAY_MS", "6000")?;
    let rate_limit_delay_secs = parse_u64("FPVDB_RATE_LIMIT_DELAY_SECS", "45")?;
    let scraper_max_attempts = parse_u32("FPVDB_SCRAPER_MAX_ATTEMPTS", "3")?;
    if scraper_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FPVDB_SCRAPER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let item_limit = parse_usize("FPVDB_ITEM_LIMIT", "100")?;
    let min_image_bytes = parse_u64("FPVDB_MIN_IMAGE_BYTES", "2000")?;
    let id_suffix = parse_id_suffix(&or_default("FPVDB_ID_SUFFIX", "hash"))?;

    Ok(AppConfig {
        firecrawl_api_key,
        scrape_api_url,
        log_level,
        catalog_path,
        images_dir,
        image_url_prefix,
        seeds_path,
        affiliate_id,
        scraper_request_timeout_secs,
        scraper_user_agent,
        inter_request_delay_ms,
        rate_limit_delay_secs,
        scraper_max_attempts,
        item_limit,
        min_image_bytes,
        id_suffix,
    })
}

fn parse_id_suffix(s: &str) -> Result<IdSuffix, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "hash" => Ok(IdSuffix::Hash),
        "random" => Ok(IdSuffix::Random),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FPVDB_ID_SUFFIX".to_string(),
            reason: format!("unknown strategy '{other}'; expected 'hash' or 'random'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
