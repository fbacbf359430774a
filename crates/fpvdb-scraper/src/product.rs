//! Product Fetcher: one candidate URL in, one candidate catalog record out.

use fpvdb_core::{
    normalize_product_url, product_id, with_affiliate_params, CatalogProduct, Enrichment, IdSuffix,
    Profile, RetailerConfig,
};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::classify::{classify_brand, classify_category};
use crate::client::PageSource;
use crate::error::ScraperError;
use crate::extract::extract_fields;
use crate::rate_limit::{scrape_with_retry, RetryPolicy};
use crate::types::ScrapedPage;

pub const CONSENSUS_REVIEW: &str = "Freshly added from GetFPV.";
const UNKNOWN_WEIGHT: &str = "N/A";
const HASH_SUFFIX_CHARS: usize = 6;

/// Settings shared by every product built in a run.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub retailer: RetailerConfig,
    pub affiliate_id: Option<String>,
    pub id_suffix: IdSuffix,
    pub retry: RetryPolicy,
}

/// Why a built candidate is not fit for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no price found")]
    MissingPrice,
    #[error("image URL '{0}' is not an absolute http(s) URL")]
    InvalidImageUrl(String),
}

/// Retrieves `url` and builds a candidate record for `profile`.
///
/// # Errors
///
/// Returns the retrieval error after rate-limit retries, or
/// [`ScraperError::EmptyPage`] when the page has no content.
pub async fn fetch_product<S: PageSource>(
    source: &S,
    url: &str,
    profile: Profile,
    options: &FetchOptions,
) -> Result<CatalogProduct, ScraperError> {
    let page = scrape_with_retry(source, url, options.retry).await?;
    build_product(&page, url, profile, options)
}

/// Builds a candidate record from an already retrieved page.
///
/// The image URL is left remote; archiving replaces it later.
///
/// # Errors
///
/// Returns [`ScraperError::EmptyPage`] when the page has no content.
pub fn build_product(
    page: &ScrapedPage,
    url: &str,
    profile: Profile,
    options: &FetchOptions,
) -> Result<CatalogProduct, ScraperError> {
    if page.content().is_none() {
        return Err(ScraperError::EmptyPage {
            url: url.to_owned(),
        });
    }

    let fields = extract_fields(page, &options.retailer);
    let id = product_id(&fields.name, &id_suffix(options.id_suffix, url));
    let getfpv_link = match options.affiliate_id.as_deref() {
        Some(afid) => with_affiliate_params(url, afid),
        None => url.to_owned(),
    };
    let weight = fields
        .specs
        .get("Weight")
        .cloned()
        .unwrap_or_else(|| UNKNOWN_WEIGHT.to_owned());

    Ok(CatalogProduct {
        id,
        brand: classify_brand(&fields.name, profile).to_owned(),
        category: classify_category(&fields.name, profile).to_owned(),
        sub_category: profile.sub_category().to_owned(),
        weight,
        description: fields.description,
        price: fields.price,
        amazon_link: String::new(),
        image_url: fields.image_url.unwrap_or_default(),
        specs: fields.specs,
        consensus_review: Some(CONSENSUS_REVIEW.to_owned()),
        dossier: None,
        hazard_level: None,
        system_verified: profile.system_verified(),
        getfpv_link,
        name: fields.name,
        extra: serde_json::Map::new(),
    })
}

/// Checks the acceptance rules that do not need the network.
///
/// # Errors
///
/// Returns the first failed rule.
pub fn validate_candidate(product: &CatalogProduct) -> Result<(), Rejection> {
    if product.price <= Decimal::ZERO {
        return Err(Rejection::MissingPrice);
    }
    let image = product.image_url.as_str();
    if !(image.starts_with("http://") || image.starts_with("https://")) {
        return Err(Rejection::InvalidImageUrl(image.to_owned()));
    }
    Ok(())
}

/// Copies an enrichment payload onto `product`.
pub fn apply_enrichment(product: &mut CatalogProduct, enrichment: &Enrichment) {
    product.hazard_level = Some(enrichment.hazard_level.clone());
    product.dossier = Some(enrichment.dossier.clone());
}

/// Id suffix for a product at `url`.
///
/// `Hash` is stable across runs for the same page; `Random` is a number in
/// `0..1000`.
#[must_use]
pub fn id_suffix(strategy: IdSuffix, url: &str) -> String {
    match strategy {
        IdSuffix::Hash => {
            let digest = Sha256::digest(normalize_product_url(url).as_bytes());
            let hex = format!("{digest:x}");
            hex[..HASH_SUFFIX_CHARS].to_owned()
        }
        IdSuffix::Random => rand::random_range(0..1000u32).to_string(),
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
