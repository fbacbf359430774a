//! Recover images for products whose picture is missing, a generic
//! placeholder, or a local file that no longer exists: the product page is
//! re-fetched and its `og:image` archived in place of the old reference.

use fpvdb_core::RetailerConfig;
use fpvdb_scraper::{extract_fields, scrape_with_retry, ImageArchiver, PageSource, RetryPolicy};
use fpvdb_store::CatalogStore;

use super::verify::{audit_local, ImageIssue};

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct HydrateSummary {
    pub hydrated: usize,
    pub failed: usize,
    /// Products with a broken image but no product page to re-fetch.
    pub no_link: usize,
}

/// Where re-fetched pages come from and how their images are stored.
pub(super) struct Hydrator<'a, S, C> {
    pub source: &'a S,
    pub store: &'a C,
    pub archiver: &'a ImageArchiver,
    pub retailer: &'a RetailerConfig,
    pub retry: RetryPolicy,
    pub url_prefix: &'a str,
}

struct Target {
    id: String,
    image_url: String,
    link: String,
}

impl<S: PageSource, C: CatalogStore> Hydrator<'_, S, C> {
    /// Rewrites every recoverable product image. The catalog is reloaded and
    /// saved after each product.
    ///
    /// # Errors
    ///
    /// Only catalog load/save failures are returned; per-product failures
    /// are logged and counted.
    pub(super) async fn run(&self) -> anyhow::Result<HydrateSummary> {
        let catalog = self.store.load()?;
        let audit = audit_local(&catalog, self.archiver.images_dir(), self.url_prefix);

        let mut summary = HydrateSummary::default();
        let mut targets = Vec::new();
        for finding in audit.findings {
            if !matches!(
                finding.issue,
                ImageIssue::Missing | ImageIssue::Generic | ImageIssue::FileNotFound
            ) {
                continue;
            }
            let link = catalog
                .products
                .iter()
                .find(|p| p.id == finding.id)
                .map(|p| p.getfpv_link.trim().to_owned())
                .unwrap_or_default();
            if link.is_empty() {
                tracing::warn!(id = %finding.id, "no product link to recover image from");
                summary.no_link += 1;
                continue;
            }
            targets.push(Target {
                id: finding.id,
                image_url: finding.image_url,
                link,
            });
        }

        for target in targets {
            if self.hydrate_one(&target).await? {
                summary.hydrated += 1;
            } else {
                summary.failed += 1;
            }
        }

        Ok(summary)
    }

    async fn hydrate_one(&self, target: &Target) -> anyhow::Result<bool> {
        let page = match scrape_with_retry(self.source, &target.link, self.retry).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(id = %target.id, url = %target.link, error = %e, "page fetch failed");
                return Ok(false);
            }
        };

        let image = extract_fields(&page, self.retailer)
            .image_url
            .filter(|u| u.starts_with("http://") || u.starts_with("https://"));
        let Some(image) = image else {
            tracing::warn!(id = %target.id, url = %target.link, "page has no usable og:image");
            return Ok(false);
        };

        let archived = match self.archiver.archive(&image, &target.id).await {
            Ok(archived) => archived,
            Err(e) => {
                tracing::warn!(id = %target.id, image = %image, error = %e, "image archive failed");
                return Ok(false);
            }
        };

        let mut catalog = self.store.load()?;
        let Some(product) = catalog
            .products
            .iter_mut()
            .find(|p| p.id == target.id && p.image_url == target.image_url)
        else {
            tracing::debug!(id = %target.id, "product changed since scan; leaving it alone");
            return Ok(false);
        };
        product.image_url = archived.public_url;
        self.store.save(&catalog)?;
        tracing::info!(id = %target.id, path = %archived.path.display(), "image recovered");
        Ok(true)
    }
}
