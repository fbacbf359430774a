pub mod catalog;
pub mod error;
pub mod json;
pub mod memory;

pub use catalog::{Catalog, DuplicateProduct};
pub use error::StoreError;
pub use json::JsonFileStore;
pub use memory::MemoryStore;

/// Load/save seam over the persisted catalog document.
///
/// Implementations must not cache: every [`CatalogStore::load`] reflects the
/// latest saved state, including writes made by other processes. Every
/// [`CatalogStore::save`] replaces the whole document.
pub trait CatalogStore {
    /// Read the current catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document is missing or unparseable.
    fn load(&self) -> Result<Catalog, StoreError>;

    /// Replace the stored document with `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be serialized or written.
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}
