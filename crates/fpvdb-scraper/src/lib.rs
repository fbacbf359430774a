pub mod archive;
pub mod classify;
pub mod client;
pub mod discover;
pub mod error;
pub mod extract;
pub mod product;
pub mod rate_limit;
pub mod types;

pub use archive::{ArchivedImage, ImageArchiver};
pub use client::{FirecrawlClient, PageSource};
pub use discover::LinkDiscoverer;
pub use error::{ArchiveError, ScraperError};
pub use extract::{extract_fields, ExtractedFields};
pub use product::{
    apply_enrichment, build_product, fetch_product, id_suffix, validate_candidate, FetchOptions,
    Rejection,
};
pub use rate_limit::{retry_on_rate_limit, scrape_with_retry, RetryPolicy};
pub use types::{PageMetadata, ScrapedPage};
