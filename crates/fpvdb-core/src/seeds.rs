//! Seed configuration: which listing pages and search terms an ingestion run
//! starts from, the retailer-specific link/title conventions, and the fixed
//! enrichment payloads that curated searches attach to their products.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Ingestion variant a seed belongs to. Fixes the sub-category label, the
/// classification rule set, and the curated-only fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Bulk category crawl: every candidate link on the listing page.
    General,
    /// Hand-picked search: only the first candidate of the result page.
    Curated,
}

impl Profile {
    #[must_use]
    pub fn sub_category(self) -> &'static str {
        match self {
            Profile::General => "General",
            Profile::Curated => "Curated",
        }
    }

    /// Curated picks are flagged as verified; bulk crawls leave it unset.
    #[must_use]
    pub fn system_verified(self) -> Option<bool> {
        match self {
            Profile::General => None,
            Profile::Curated => Some(true),
        }
    }

    /// Maximum candidate links taken from one seed page, `None` for all.
    #[must_use]
    pub fn candidate_limit(self) -> Option<usize> {
        match self {
            Profile::General => None,
            Profile::Curated => Some(1),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::General => write!(f, "general"),
            Profile::Curated => write!(f, "curated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    pub hazard_level: String,
    pub dossier: String,
    /// Name fragments (case-insensitive) identifying catalog products this
    /// payload belongs to, for enriching products that are already stored.
    #[serde(default)]
    pub match_names: Vec<String>,
}

impl Enrichment {
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.match_names.iter().any(|fragment| {
            !fragment.trim().is_empty() && name.contains(&fragment.to_lowercase())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSeed {
    pub term: String,
    /// Key into [`SeedsFile::enrichments`].
    #[serde(default)]
    pub enrichment: Option<String>,
}

/// Retailer conventions used by link discovery and field extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetailerConfig {
    /// Scheme + host that relative links resolve against when the page URL has
    /// none, e.g. `https://www.getfpv.com`.
    pub origin: String,
    /// Removed from page titles to obtain product names.
    pub title_suffix: String,
    /// A product page path ends with this marker.
    pub product_suffix: String,
    /// Search results page; the term is appended as `?q=`.
    pub search_url: String,
    /// A link containing any of these is never a product page.
    pub deny_substrings: Vec<String>,
    /// Paths of top-level category pages that look like products.
    pub category_pages: Vec<String>,
}

impl Default for RetailerConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.getfpv.com".to_string(),
            title_suffix: " - GetFPV".to_string(),
            product_suffix: ".html".to_string(),
            search_url: "https://www.getfpv.com/catalogsearch/result/".to_string(),
            deny_substrings: ["category", "review", "login", "blog", "account", "wishlist", "#"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            category_pages: vec!["/fpv.html".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedsFile {
    #[serde(default)]
    pub retailer: RetailerConfig,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub searches: Vec<SearchSeed>,
    #[serde(default)]
    pub enrichments: HashMap<String, Enrichment>,
}

/// A resolved starting page for an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Category {
        url: String,
    },
    Search {
        term: String,
        url: String,
        enrichment: Option<Enrichment>,
    },
}

impl Seed {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Seed::Category { url } | Seed::Search { url, .. } => url,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Profile {
        match self {
            Seed::Category { .. } => Profile::General,
            Seed::Search { .. } => Profile::Curated,
        }
    }

    #[must_use]
    pub fn enrichment(&self) -> Option<&Enrichment> {
        match self {
            Seed::Category { .. } => None,
            Seed::Search { enrichment, .. } => enrichment.as_ref(),
        }
    }

    /// Short human label for logs: the URL for categories, the term for searches.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Seed::Category { url } => url,
            Seed::Search { term, .. } => term,
        }
    }
}

/// Which seed groups a run should visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedFilter {
    #[default]
    All,
    CategoriesOnly,
    SearchesOnly,
}

impl SeedsFile {
    /// Resolve configured categories and searches into [`Seed`]s, categories
    /// first, each group in file order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the search URL is not a valid URL.
    pub fn seeds(&self, filter: SeedFilter) -> Result<Vec<Seed>, ConfigError> {
        let mut seeds = Vec::new();

        if filter != SeedFilter::SearchesOnly {
            seeds.extend(
                self.categories
                    .iter()
                    .map(|url| Seed::Category { url: url.clone() }),
            );
        }

        if filter != SeedFilter::CategoriesOnly {
            for search in &self.searches {
                let mut url = url::Url::parse(&self.retailer.search_url).map_err(|e| {
                    ConfigError::Validation(format!(
                        "retailer search_url '{}' is not a valid URL: {e}",
                        self.retailer.search_url
                    ))
                })?;
                url.query_pairs_mut().append_pair("q", &search.term);
                let enrichment = search
                    .enrichment
                    .as_ref()
                    .and_then(|id| self.enrichments.get(id))
                    .cloned();
                seeds.push(Seed::Search {
                    term: search.term.clone(),
                    url: url.to_string(),
                    enrichment,
                });
            }
        }

        Ok(seeds)
    }

    /// The enrichment whose `match_names` cover `product_name`. When several
    /// match, the one with the alphabetically first id wins.
    #[must_use]
    pub fn enrichment_for_name(&self, product_name: &str) -> Option<(&str, &Enrichment)> {
        let mut ids: Vec<&String> = self.enrichments.keys().collect();
        ids.sort();
        ids.into_iter().find_map(|id| {
            let enrichment = &self.enrichments[id];
            enrichment
                .matches_name(product_name)
                .then_some((id.as_str(), enrichment))
        })
    }
}

/// Load and validate the seeds configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seeds(path: &Path) -> Result<SeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seeds_file: SeedsFile = serde_yaml::from_str(&content)?;

    validate_seeds(&seeds_file)?;

    Ok(seeds_file)
}

fn validate_seeds(seeds_file: &SeedsFile) -> Result<(), ConfigError> {
    if seeds_file.categories.is_empty() && seeds_file.searches.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category or search seed is required".to_string(),
        ));
    }

    if url::Url::parse(&seeds_file.retailer.origin).is_err() {
        return Err(ConfigError::Validation(format!(
            "retailer origin '{}' is not a valid URL",
            seeds_file.retailer.origin
        )));
    }

    if seeds_file.retailer.product_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "retailer product_suffix must be non-empty".to_string(),
        ));
    }

    for category in &seeds_file.categories {
        let is_http = url::Url::parse(category)
            .is_ok_and(|u| u.scheme() == "http" || u.scheme() == "https");
        if !is_http {
            return Err(ConfigError::Validation(format!(
                "category seed '{category}' must be an absolute http(s) URL"
            )));
        }
    }

    let mut seen_terms = HashSet::new();
    for search in &seeds_file.searches {
        if search.term.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search term must be non-empty".to_string(),
            ));
        }

        if !seen_terms.insert(search.term.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate search term: '{}'",
                search.term
            )));
        }

        if let Some(id) = &search.enrichment {
            if !seeds_file.enrichments.contains_key(id) {
                return Err(ConfigError::Validation(format!(
                    "search '{}' references unknown enrichment '{id}'",
                    search.term
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "seeds_test.rs"]
mod tests;
