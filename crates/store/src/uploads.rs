//! The directory holding uploaded photos and their thumbnails.

use std::path::{Path, PathBuf};

use skudesk_core::naming::validate_stored_name;

use crate::error::StoreResult;

/// Flat directory of stored files, addressed by bare file name.
///
/// Every name is checked with [`validate_stored_name`] before it touches the
/// filesystem, so callers may pass names that came from clients.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if it does not exist.
    pub async fn ensure(&self) -> StoreResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path_of(&self, name: &str) -> StoreResult<PathBuf> {
        validate_stored_name(name)?;
        Ok(self.root.join(name))
    }

    pub async fn write(&self, name: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.path_of(name)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Read a stored file, or `None` if it does not exist.
    pub async fn read(&self, name: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.path_of(name)?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file. Returns whether it existed.
    pub async fn remove_if_exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_of(name)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every regular file in the directory. Returns how many.
    pub async fn clear(&self) -> StoreResult<usize> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        tracing::info!(root = %self.root.display(), removed, "Uploads directory cleared");
        Ok(removed)
    }
}
