use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the persisted catalog (`{"products": [...]}`).
///
/// Field names are camelCase on disk because the storefront reads the same
/// file. Keys this crate does not model are kept in `extra` so that a
/// load/save cycle never drops data written by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// `slug(name)-suffix`, e.g. `"iflight-nazgul-evoque-f5-3f9a1c"`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: String,
    /// Value of the `Weight` spec, or `"N/A"`.
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub description: String,
    /// Stored as a JSON number. Zero means no price was found.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub amazon_link: String,
    /// Remote URL while in flight; local public path once archived.
    #[serde(default)]
    pub image_url: String,
    /// Short label → short value, in page order.
    #[serde(default)]
    pub specs: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dossier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hazard_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_verified: Option<bool>,
    /// Canonical retailer product URL, possibly carrying affiliate params.
    #[serde(default)]
    pub getfpv_link: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogProduct {
    /// `true` once the image has been rewritten to a local public path.
    #[must_use]
    pub fn has_local_image(&self) -> bool {
        self.image_url.starts_with('/') && !self.image_url.starts_with("//")
    }

    /// The product link reduced to origin + path, used for dedup.
    #[must_use]
    pub fn normalized_link(&self) -> String {
        normalize_product_url(&self.getfpv_link)
    }
}

/// Generate a URL-safe slug: lowercase, whitespace runs become `-`, anything
/// outside `[a-z0-9_-]` is dropped, dash runs collapse, edges are trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '-' {
                '-'
            } else if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Build a product id from its display name and a disambiguating suffix.
#[must_use]
pub fn product_id(name: &str, suffix: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("product-{suffix}")
    } else {
        format!("{slug}-{suffix}")
    }
}

/// Reduce a product link to `origin + path` (query and fragment stripped).
///
/// Falls back to the raw string when it does not parse as a URL.
#[must_use]
pub fn normalize_product_url(link: &str) -> String {
    url::Url::parse(link).map_or_else(
        |_| link.to_string(),
        |u| format!("{}{}", u.origin().ascii_serialization(), u.path()),
    )
}

/// Append `afid=<id>&referring_service=link` to a product URL, joined with
/// `&` when the URL already has a query string and `?` otherwise.
#[must_use]
pub fn with_affiliate_params(url: &str, affiliate_id: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}afid={affiliate_id}&referring_service=link")
}
