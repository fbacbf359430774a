//! Catalog persisted as a single pretty-printed JSON file.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Catalog, CatalogStore, StoreError};

/// File-backed [`CatalogStore`].
///
/// `load` re-reads the file on every call. `save` writes the full document to
/// a temporary sibling file and renames it over the target, so a reader doing
/// whole-file reads sees either the old or the new document, never a partial
/// one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Catalog, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Io {
            path: self.display_path(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.display_path(),
            source: e,
        })
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(catalog).map_err(StoreError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let persist_err = |source: std::io::Error| StoreError::Persist {
            path: self.display_path(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(persist_err)?;
        tmp.write_all(body.as_bytes()).map_err(persist_err)?;
        // A fresh temp file is owner-only; keep the mode the catalog already has.
        if let Ok(existing) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(persist_err)?;
        }
        tmp.as_file().sync_all().map_err(persist_err)?;
        tmp.persist(&self.path).map_err(|e| persist_err(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            products = catalog.products.len(),
            "catalog saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("products.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_reads_products_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            r#"{"products":[{"id":"a-1","name":"A","price":9.99,"getfpvLink":"https://www.getfpv.com/a.html"}]}"#,
        );
        let catalog = JsonFileStore::new(path).load().unwrap();
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].id, "a-1");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileStore::new(dir.path().join("nope.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn load_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "{ not json");
        let err = JsonFileStore::new(path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn save_then_load_reflects_latest_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{"products":[],"meta":{"source":"seed"}}"#);
        let store = JsonFileStore::new(&path);

        let mut catalog = store.load().unwrap();
        let product: fpvdb_core::CatalogProduct = serde_json::from_value(serde_json::json!({
            "id": "b-2",
            "name": "B",
            "price": 20,
            "imageUrl": "/images/parts/b-2.jpg"
        }))
        .unwrap();
        catalog.try_add(product).unwrap();
        store.save(&catalog).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.products.len(), 1);
        assert_eq!(reloaded.products[0].image_url, "/images/parts/b-2.jpg");
        assert_eq!(reloaded.extra["meta"]["source"], "seed");
    }

    #[test]
    fn save_writes_pretty_json_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{"products":[]}"#);
        JsonFileStore::new(&path).save(&Catalog::default()).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body, "{\n  \"products\": []\n}");

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "only products.json should remain");
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), r#"{"products":[]}"#);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        JsonFileStore::new(&path).save(&Catalog::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
