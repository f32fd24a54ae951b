//! The operator credential file.
//!
//! Holds a single admin account. The file is rewritten on every boot from
//! configuration, so edits made while the server runs do not survive a
//! restart.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::write_replace;

/// A stored login. The password is kept only as a PHC hash string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
}

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with a single admin credential.
    pub async fn reset_admin(&self, username: &str, password_hash: &str) -> StoreResult<()> {
        let credential = Credential {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        write_replace(&self.path, &serde_json::to_vec_pretty(&[credential])?).await?;
        tracing::info!(username, path = %self.path.display(), "Admin credential reset");
        Ok(())
    }

    /// Look up a credential by username. A missing file has no credentials.
    pub async fn find(&self, username: &str) -> StoreResult<Option<Credential>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credentials: Vec<Credential> = serde_json::from_slice(&bytes)?;
        Ok(credentials.into_iter().find(|c| c.username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reset_replaces_previous_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));

        store.reset_admin("admin", "$argon2id$old").await.unwrap();
        store.reset_admin("admin", "$argon2id$new").await.unwrap();

        let found = store.find("admin").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "$argon2id$new");
    }

    #[tokio::test]
    async fn unknown_user_or_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials.json"));
        assert_eq!(store.find("admin").await.unwrap(), None);

        store.reset_admin("admin", "hash").await.unwrap();
        assert_eq!(store.find("root").await.unwrap(), None);
    }
}
