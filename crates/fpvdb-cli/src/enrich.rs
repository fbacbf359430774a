//! `enrich`: attach the configured hazard level and dossier to products that
//! are already in the catalog, matched by name.

use clap::Args;
use fpvdb_core::{load_seeds, AppConfig, SeedsFile};
use fpvdb_scraper::apply_enrichment;
use fpvdb_store::{CatalogStore, JsonFileStore};

#[derive(Debug, Args)]
pub(crate) struct EnrichArgs {
    /// List the products that would be enriched without saving anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct EnrichSummary {
    pub enriched: usize,
    /// Matched products that already carry the same payload.
    pub unchanged: usize,
}

/// Applies matching enrichments one product at a time, reloading the catalog
/// before and saving it after each change.
pub(crate) fn enrich_catalog<C: CatalogStore>(
    store: &C,
    seeds: &SeedsFile,
) -> anyhow::Result<EnrichSummary> {
    let ids: Vec<String> = store
        .load()?
        .products
        .iter()
        .filter(|p| seeds.enrichment_for_name(&p.name).is_some())
        .map(|p| p.id.clone())
        .collect();

    let mut summary = EnrichSummary::default();
    for id in ids {
        let mut catalog = store.load()?;
        let Some(product) = catalog.products.iter_mut().find(|p| p.id == id) else {
            tracing::debug!(id = %id, "product removed since scan");
            continue;
        };
        let Some((enrichment_id, enrichment)) = seeds.enrichment_for_name(&product.name) else {
            continue;
        };
        if product.hazard_level.as_deref() == Some(enrichment.hazard_level.as_str())
            && product.dossier.as_deref() == Some(enrichment.dossier.as_str())
        {
            summary.unchanged += 1;
            continue;
        }

        apply_enrichment(product, enrichment);
        store.save(&catalog)?;
        summary.enriched += 1;
        tracing::info!(id = %id, enrichment = enrichment_id, "product enriched");
    }

    Ok(summary)
}

pub(crate) fn run_enrich(config: &AppConfig, args: &EnrichArgs) -> anyhow::Result<()> {
    let seeds = load_seeds(&config.seeds_path)?;
    let store = JsonFileStore::new(&config.catalog_path);

    if args.dry_run {
        for product in &store.load()?.products {
            if let Some((enrichment_id, _)) = seeds.enrichment_for_name(&product.name) {
                println!("  [{enrichment_id}] {} ({})", product.name, product.id);
            }
        }
        return Ok(());
    }

    let summary = enrich_catalog(&store, &seeds)?;
    println!(
        "enriched {} product(s), {} already up to date",
        summary.enriched, summary.unchanged
    );
    Ok(())
}
