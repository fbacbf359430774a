use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert!(cfg.firecrawl_api_key.is_none());
    assert_eq!(cfg.scrape_api_url, "https://api.firecrawl.dev");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.catalog_path,
        std::path::PathBuf::from("./src/data/products.json")
    );
    assert_eq!(
        cfg.images_dir,
        std::path::PathBuf::from("./public/images/parts")
    );
    assert_eq!(cfg.image_url_prefix, "/images/parts");
    assert!(cfg.affiliate_id.is_none());
    assert_eq!(cfg.scraper_request_timeout_secs, 60);
    assert_eq!(cfg.inter_request_delay_ms, 6000);
    assert_eq!(cfg.rate_limit_delay_secs, 45);
    assert_eq!(cfg.scraper_max_attempts, 3);
    assert_eq!(cfg.item_limit, 100);
    assert_eq!(cfg.min_image_bytes, 2000);
    assert_eq!(cfg.id_suffix, IdSuffix::Hash);
}

#[test]
fn api_key_and_affiliate_are_read_when_present() {
    let mut map = HashMap::new();
    map.insert("FIRECRAWL_API_KEY", "fc-test");
    map.insert("FPVDB_AFFILIATE_ID", "abc123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.firecrawl_api_key.as_deref(), Some("fc-test"));
    assert_eq!(cfg.affiliate_id.as_deref(), Some("abc123"));
}

#[test]
fn blank_affiliate_id_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("FPVDB_AFFILIATE_ID", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.affiliate_id.is_none());
}

#[test]
fn image_url_prefix_trailing_slash_is_trimmed() {
    let mut map = HashMap::new();
    map.insert("FPVDB_IMAGE_URL_PREFIX", "/img/parts/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.image_url_prefix, "/img/parts");
}

#[test]
fn item_limit_override() {
    let mut map = HashMap::new();
    map.insert("FPVDB_ITEM_LIMIT", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.item_limit, 5);
}

#[test]
fn item_limit_invalid() {
    let mut map = HashMap::new();
    map.insert("FPVDB_ITEM_LIMIT", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FPVDB_ITEM_LIMIT"),
        "expected InvalidEnvVar(FPVDB_ITEM_LIMIT), got: {result:?}"
    );
}

#[test]
fn inter_request_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("FPVDB_INTER_REQUEST_DELAY_MS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FPVDB_INTER_REQUEST_DELAY_MS"),
        "expected InvalidEnvVar(FPVDB_INTER_REQUEST_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn zero_max_attempts_is_rejected() {
    let mut map = HashMap::new();
    map.insert("FPVDB_SCRAPER_MAX_ATTEMPTS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FPVDB_SCRAPER_MAX_ATTEMPTS"),
        "expected InvalidEnvVar(FPVDB_SCRAPER_MAX_ATTEMPTS), got: {result:?}"
    );
}

#[test]
fn id_suffix_random_is_accepted_case_insensitively() {
    let mut map = HashMap::new();
    map.insert("FPVDB_ID_SUFFIX", "Random");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.id_suffix, IdSuffix::Random);
}

#[test]
fn id_suffix_unknown_fails() {
    let mut map = HashMap::new();
    map.insert("FPVDB_ID_SUFFIX", "uuid");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FPVDB_ID_SUFFIX"),
        "expected InvalidEnvVar(FPVDB_ID_SUFFIX), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("FIRECRAWL_API_KEY", "fc-super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("fc-super-secret"));
    assert!(rendered.contains("[redacted]"));
}
