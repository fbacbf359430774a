//! The catalog document and its dedup views.

use std::collections::HashSet;

use fpvdb_core::{normalize_product_url, CatalogProduct};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level catalog file: `{ "products": [...] }`.
///
/// Other top-level keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<CatalogProduct>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why [`Catalog::try_add`] refused a product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuplicateProduct {
    #[error("product id '{0}' already exists")]
    Id(String),
    #[error("product URL '{0}' already exists")]
    Url(String),
}

impl Catalog {
    /// Ids of every stored product.
    #[must_use]
    pub fn existing_ids(&self) -> HashSet<String> {
        self.products.iter().map(|p| p.id.clone()).collect()
    }

    /// Product links reduced to origin + path. Unparseable links are kept
    /// verbatim; empty links are skipped.
    #[must_use]
    pub fn existing_urls(&self) -> HashSet<String> {
        self.products
            .iter()
            .filter(|p| !p.getfpv_link.is_empty())
            .map(CatalogProduct::normalized_link)
            .collect()
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.products.iter().any(|p| p.id == id)
    }

    /// `url` is compared after normalization.
    #[must_use]
    pub fn contains_url(&self, url: &str) -> bool {
        let wanted = normalize_product_url(url);
        self.products
            .iter()
            .filter(|p| !p.getfpv_link.is_empty())
            .any(|p| p.normalized_link() == wanted)
    }

    /// Append `product` unless its id or normalized link is already present.
    ///
    /// Call this on a freshly loaded catalog; the check is only as current as
    /// the last [`crate::CatalogStore::load`].
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateProduct`] and leaves the catalog unchanged when the
    /// product is already known.
    pub fn try_add(&mut self, product: CatalogProduct) -> Result<(), DuplicateProduct> {
        if self.contains_id(&product.id) {
            return Err(DuplicateProduct::Id(product.id));
        }
        if !product.getfpv_link.is_empty() && self.contains_url(&product.getfpv_link) {
            return Err(DuplicateProduct::Url(product.normalized_link()));
        }
        self.products.push(product);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, link: &str) -> CatalogProduct {
        CatalogProduct {
            id: id.to_string(),
            name: id.to_string(),
            brand: "Generic".to_string(),
            category: "Components".to_string(),
            sub_category: "General".to_string(),
            weight: "N/A".to_string(),
            description: String::new(),
            price: Decimal::new(1000, 2),
            amazon_link: String::new(),
            image_url: format!("/images/parts/{id}.jpg"),
            specs: IndexMap::new(),
            consensus_review: None,
            dossier: None,
            hazard_level: None,
            system_verified: None,
            getfpv_link: link.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn existing_urls_normalize_and_fall_back() {
        let catalog = Catalog {
            products: vec![
                product("a", "https://www.getfpv.com/a.html?afid=1&referring_service=link"),
                product("b", "garbage link"),
                product("c", ""),
            ],
            extra: Map::new(),
        };
        let urls = catalog.existing_urls();
        assert_eq!(urls.len(), 2);
        assert!(urls.contains("https://www.getfpv.com/a.html"));
        assert!(urls.contains("garbage link"));
    }

    #[test]
    fn existing_ids_lists_every_product() {
        let catalog = Catalog {
            products: vec![product("a", ""), product("b", "")],
            extra: Map::new(),
        };
        let ids = catalog.existing_ids();
        assert!(ids.contains("a") && ids.contains("b"));
    }

    #[test]
    fn try_add_rejects_duplicate_id() {
        let mut catalog = Catalog::default();
        catalog
            .try_add(product("a", "https://www.getfpv.com/a.html"))
            .unwrap();
        let err = catalog
            .try_add(product("a", "https://www.getfpv.com/other.html"))
            .unwrap_err();
        assert_eq!(err, DuplicateProduct::Id("a".to_string()));
        assert_eq!(catalog.products.len(), 1);
    }

    #[test]
    fn try_add_rejects_same_link_with_different_query() {
        let mut catalog = Catalog::default();
        catalog
            .try_add(product("a", "https://www.getfpv.com/a.html"))
            .unwrap();
        let err = catalog
            .try_add(product("b", "https://www.getfpv.com/a.html?afid=9"))
            .unwrap_err();
        assert_eq!(
            err,
            DuplicateProduct::Url("https://www.getfpv.com/a.html".to_string())
        );
    }

    #[test]
    fn try_add_allows_products_without_links() {
        let mut catalog = Catalog::default();
        catalog.try_add(product("a", "")).unwrap();
        catalog.try_add(product("b", "")).unwrap();
        assert_eq!(catalog.products.len(), 2);
    }

    #[test]
    fn extra_top_level_keys_round_trip() {
        let raw = serde_json::json!({ "products": [], "version": 3 });
        let catalog: Catalog = serde_json::from_value(raw).unwrap();
        assert_eq!(catalog.extra.get("version"), Some(&serde_json::json!(3)));
        let back = serde_json::to_value(&catalog).unwrap();
        assert_eq!(back["version"], 3);
    }

    #[test]
    fn missing_products_array_is_rejected() {
        let raw = serde_json::json!({ "items": [] });
        assert!(serde_json::from_value::<Catalog>(raw).is_err());
    }
}
