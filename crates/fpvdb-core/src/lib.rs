pub mod app_config;
pub mod config;
pub mod products;
pub mod seeds;

use thiserror::Error;

pub use app_config::{AppConfig, IdSuffix};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    normalize_product_url, product_id, slugify, with_affiliate_params, CatalogProduct,
};
pub use seeds::{
    load_seeds, Enrichment, Profile, RetailerConfig, SearchSeed, Seed, SeedFilter, SeedsFile,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seeds file {path}: {source}")]
    SeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seeds file: {0}")]
    SeedsFileParse(#[from] serde_yaml::Error),

    #[error("seeds validation failed: {0}")]
    Validation(String),
}
