//! Ingestion Driver: seeds → candidate links → products → catalog.
//!
//! Strictly sequential. Every accepted product is saved before the next link
//! is fetched, and the catalog is reloaded right before each mutation so
//! writes made by another process in the meantime are kept. Per-link failures
//! are counted and skipped; only catalog I/O errors end the run.

use std::collections::HashSet;
use std::time::Duration;

use fpvdb_core::Seed;
use fpvdb_scraper::{
    apply_enrichment, fetch_product, scrape_with_retry, validate_candidate, FetchOptions,
    ImageArchiver, LinkDiscoverer, PageSource,
};
use fpvdb_store::{CatalogStore, StoreError};

#[derive(Debug, Clone)]
pub(crate) struct DriverSettings {
    /// Maximum number of products added in one run.
    pub limit: usize,
    /// Pause before every product fetch.
    pub inter_request_delay: Duration,
    pub fetch: FetchOptions,
}

/// Totals for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IngestSummary {
    pub added: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub failed: usize,
    pub failed_seeds: usize,
    pub limit: usize,
    /// Ids of the products added, in order.
    pub added_ids: Vec<String>,
    /// `(url, reason)` for every rejected or failed link.
    pub skipped: Vec<(String, String)>,
}

/// What happened to one candidate link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkOutcome {
    Added { id: String },
    /// Id or normalized URL already in the catalog.
    Duplicate,
    /// Fetched, but failed a validation rule or image archiving.
    Rejected { reason: String },
    /// Retrieval failed.
    Failed { reason: String },
}

pub(crate) struct IngestDriver<'a, S, C> {
    source: &'a S,
    store: &'a C,
    archiver: &'a ImageArchiver,
    discoverer: LinkDiscoverer,
    settings: DriverSettings,
}

impl<'a, S: PageSource, C: CatalogStore> IngestDriver<'a, S, C> {
    pub fn new(
        source: &'a S,
        store: &'a C,
        archiver: &'a ImageArchiver,
        settings: DriverSettings,
    ) -> Self {
        Self {
            source,
            store,
            archiver,
            discoverer: LinkDiscoverer::new(&settings.fetch.retailer),
            settings,
        }
    }

    /// Processes `seeds` in order until they are exhausted or the limit is
    /// reached.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the catalog cannot be loaded or saved.
    pub async fn run(&self, seeds: &[Seed]) -> Result<IngestSummary, StoreError> {
        let discoverer = self
            .discoverer
            .clone()
            .with_category_urls(seeds.iter().filter_map(|seed| match seed {
                Seed::Category { url } => Some(url.as_str()),
                Seed::Search { .. } => None,
            }));

        let mut summary = IngestSummary {
            limit: self.settings.limit,
            ..IngestSummary::default()
        };
        let mut visited: HashSet<String> = HashSet::new();

        'seeds: for seed in seeds {
            if summary.added >= self.settings.limit {
                break;
            }
            tracing::info!(
                seed = seed.label(),
                profile = %seed.profile(),
                "processing seed"
            );

            let page = match scrape_with_retry(self.source, seed.url(), self.settings.fetch.retry)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(
                        seed = seed.label(),
                        url = seed.url(),
                        error = %e,
                        "seed scrape failed"
                    );
                    summary.failed_seeds += 1;
                    continue;
                }
            };

            let mut candidates =
                discoverer.discover(page.content().unwrap_or_default(), seed.url());
            if let Some(max) = seed.profile().candidate_limit() {
                candidates.truncate(max);
            }

            let existing = self.store.load()?.existing_urls();
            let fresh: Vec<String> = candidates
                .into_iter()
                .filter(|url| !existing.contains(url) && !visited.contains(url))
                .collect();
            tracing::info!(seed = seed.label(), new = fresh.len(), "candidate links");

            for url in fresh {
                if summary.added >= self.settings.limit {
                    break 'seeds;
                }
                visited.insert(url.clone());
                tokio::time::sleep(self.settings.inter_request_delay).await;

                match self.ingest_link(&url, seed).await? {
                    LinkOutcome::Added { id } => {
                        summary.added += 1;
                        summary.added_ids.push(id);
                    }
                    LinkOutcome::Duplicate => summary.duplicates += 1,
                    LinkOutcome::Rejected { reason } => {
                        summary.rejected += 1;
                        summary.skipped.push((url, reason));
                    }
                    LinkOutcome::Failed { reason } => {
                        summary.failed += 1;
                        summary.skipped.push((url, reason));
                    }
                }
            }
        }

        if summary.added >= self.settings.limit {
            tracing::info!(limit = self.settings.limit, "item limit reached");
        }
        Ok(summary)
    }

    /// Fetches, validates, archives and persists one candidate.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only; everything else becomes a [`LinkOutcome`].
    pub async fn ingest_link(&self, url: &str, seed: &Seed) -> Result<LinkOutcome, StoreError> {
        let mut product =
            match fetch_product(self.source, url, seed.profile(), &self.settings.fetch).await {
                Ok(product) => product,
                Err(e) => {
                    tracing::warn!(url, error = %e, "product fetch failed");
                    return Ok(LinkOutcome::Failed {
                        reason: e.to_string(),
                    });
                }
            };

        if let Err(rejection) = validate_candidate(&product) {
            tracing::warn!(url, name = %product.name, reason = %rejection, "product rejected");
            return Ok(LinkOutcome::Rejected {
                reason: rejection.to_string(),
            });
        }

        if let Some(enrichment) = seed.enrichment() {
            apply_enrichment(&mut product, enrichment);
        }

        let snapshot = self.store.load()?;
        if snapshot.contains_id(&product.id) || snapshot.contains_url(url) {
            tracing::debug!(url, id = %product.id, "already in catalog");
            return Ok(LinkOutcome::Duplicate);
        }

        let archived = match self.archiver.archive(&product.image_url, &product.id).await {
            Ok(archived) => archived,
            Err(e) => {
                tracing::warn!(
                    url,
                    image = %product.image_url,
                    error = %e,
                    "image archive failed"
                );
                return Ok(LinkOutcome::Rejected {
                    reason: e.to_string(),
                });
            }
        };
        product.image_url = archived.public_url;

        let mut catalog = self.store.load()?;
        let id = product.id.clone();
        let name = product.name.clone();
        if let Err(dup) = catalog.try_add(product) {
            tracing::debug!(url, error = %dup, "already in catalog");
            return Ok(LinkOutcome::Duplicate);
        }
        self.store.save(&catalog)?;

        tracing::info!(id = %id, name = %name, total = catalog.products.len(), "product added");
        Ok(LinkOutcome::Added { id })
    }
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
