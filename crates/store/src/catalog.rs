//! The catalog JSON file.

use std::path::{Path, PathBuf};

use skudesk_core::error::CoreError;
use skudesk_core::item::Item;
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::write_replace;

/// Catalog persisted as a pretty-printed JSON array.
///
/// Every mutation goes through [`update`](CatalogStore::update) (or one of
/// the whole-catalog writes), which holds a process-wide writer lock for the
/// full load, modify, save sequence. Two edits never interleave; the later
/// one simply sees the earlier one's result.
pub struct CatalogStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current catalog. A missing or blank file is an empty catalog.
    pub async fn load(&self) -> StoreResult<Vec<Item>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Apply `f` to the current catalog and persist the result.
    ///
    /// Nothing is written when `f` fails. Returns the saved catalog together
    /// with whatever `f` produced.
    pub async fn update<F, T>(&self, f: F) -> StoreResult<(Vec<Item>, T)>
    where
        F: FnOnce(&mut Vec<Item>) -> Result<T, CoreError>,
    {
        let _guard = self.writer.lock().await;

        let mut items = self.load().await?;
        let output = f(&mut items)?;
        self.save(&items).await?;

        Ok((items, output))
    }

    /// Replace the whole catalog.
    pub async fn replace(&self, items: Vec<Item>) -> StoreResult<Vec<Item>> {
        let _guard = self.writer.lock().await;
        self.save(&items).await?;
        Ok(items)
    }

    /// Delete the catalog file and start over with an empty catalog.
    pub async fn reset(&self) -> StoreResult<()> {
        let _guard = self.writer.lock().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.save(&[]).await
    }

    async fn save(&self, items: &[Item]) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(items)?;
        write_replace(&self.path, &json).await?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "Catalog saved");
        Ok(())
    }
}
