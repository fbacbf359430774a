//! Rewrite remaining remote `imageUrl`s to archived local copies.

use fpvdb_scraper::ImageArchiver;
use fpvdb_store::CatalogStore;

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct LocalizeSummary {
    pub localized: usize,
    pub failed: usize,
}

/// Archives every remote product image and points the product at the local
/// copy. The catalog is reloaded and saved after each product, so a crash
/// keeps everything localized so far.
pub(super) async fn localize_images<C: CatalogStore>(
    store: &C,
    archiver: &ImageArchiver,
) -> anyhow::Result<LocalizeSummary> {
    let targets: Vec<(String, String)> = store
        .load()?
        .products
        .iter()
        .filter(|p| p.image_url.starts_with("http://") || p.image_url.starts_with("https://"))
        .map(|p| (p.id.clone(), p.image_url.clone()))
        .collect();

    let mut summary = LocalizeSummary::default();
    for (id, url) in targets {
        let archived = match archiver.archive(&url, &id).await {
            Ok(archived) => archived,
            Err(e) => {
                tracing::warn!(id = %id, url = %url, error = %e, "could not localize image");
                summary.failed += 1;
                continue;
            }
        };

        let mut catalog = store.load()?;
        let Some(product) = catalog
            .products
            .iter_mut()
            .find(|p| p.id == id && p.image_url == url)
        else {
            tracing::debug!(id = %id, "product changed since scan; leaving it alone");
            continue;
        };
        product.image_url = archived.public_url;
        store.save(&catalog)?;
        summary.localized += 1;
        tracing::info!(id = %id, path = %archived.path.display(), "image localized");
    }

    Ok(summary)
}
