//! In-memory [`CatalogStore`] for tests and dry runs.

use std::sync::{Mutex, PoisonError};

use crate::{Catalog, CatalogStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    current: Catalog,
    /// Every document passed to `save`, oldest first.
    history: Vec<Catalog>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: catalog,
                history: Vec::new(),
            }),
        }
    }

    /// Number of completed saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Snapshots of every saved document, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Catalog> {
        self.lock().history.clone()
    }

    /// Current document, as the next `load` would return it.
    #[must_use]
    pub fn snapshot(&self) -> Catalog {
        self.lock().current.clone()
    }

    /// Replace the document without recording a save, simulating a write by
    /// another process.
    pub fn replace_external(&self, catalog: Catalog) {
        self.lock().current = catalog;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        Ok(self.lock().current.clone())
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.current = catalog.clone();
        inner.history.push(catalog.clone());
        Ok(())
    }
}
