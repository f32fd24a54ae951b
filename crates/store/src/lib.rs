//! Flat-file persistence for the catalog, uploads and credentials.
//!
//! There is no database: the catalog is one JSON file rewritten in full on
//! every change, and photos are plain files in one directory.

pub mod catalog;
pub mod credentials;
pub mod error;
pub mod uploads;

pub use catalog::CatalogStore;
pub use credentials::{Credential, CredentialStore};
pub use error::{StoreError, StoreResult};
pub use uploads::UploadDir;

use std::path::Path;

/// Write `bytes` to a temporary sibling of `path`, then rename it over `path`.
///
/// Readers never observe a half-written file.
pub(crate) async fn write_replace(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}
