//! Local persistence of the credential token
//!
//! Exactly one opaque token survives restarts. Nothing else about the
//! session is written to disk.

use async_trait::async_trait;
use directories::ProjectDirs;
use gatehouse_model::CredentialToken;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use super::errors::StorageError;

pub(crate) const CREDENTIAL_FILE: &str = "credential.token";

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save(&self, token: &CredentialToken) -> Result<(), StorageError>;

    /// Stored token, or `None` when nothing usable is stored
    async fn load(&self) -> Result<Option<CredentialToken>, StorageError>;

    /// Remove the stored token; clearing an empty store succeeds
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Token kept in a single file in the platform data directory
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store under the platform data directory for this application
    pub fn new() -> Result<Self, StorageError> {
        let proj_dirs = ProjectDirs::from("", "gatehouse", "gatehouse-client")
            .ok_or_else(|| {
                StorageError::InitFailed("Unable to determine data directory".into())
            })?;

        Ok(Self::with_path(proj_dirs.data_dir().join(CREDENTIAL_FILE)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn save(&self, token: &CredentialToken) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::WriteFailed)?;
        }

        tokio::fs::write(&self.path, token.expose_secret().as_bytes())
            .await
            .map_err(StorageError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = tokio::fs::metadata(&self.path)
                .await
                .map_err(StorageError::WriteFailed)?
                .permissions();
            perms.set_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms)
                .await
                .map_err(StorageError::WriteFailed)?;
        }

        log::debug!("[CredentialStore] Saved token to {:?}", self.path);
        Ok(())
    }

    async fn load(&self) -> Result<Option<CredentialToken>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::ReadFailed(err)),
        };

        let token = CredentialToken::new(raw.trim());
        if token.is_blank() {
            return Ok(None);
        }
        Ok(Some(token))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                log::info!("[CredentialStore] Cleared stored token");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::WriteFailed(err)),
        }
    }
}

/// In-process store for tests and sessions that must not touch disk
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<CredentialToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: CredentialToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    pub fn peek(&self) -> Option<CredentialToken> {
        self.token.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn save(&self, token: &CredentialToken) -> Result<(), StorageError> {
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CredentialToken>, StorageError> {
        Ok(self.token.lock().clone().filter(|token| !token.is_blank()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().await.unwrap().is_none());

        store.save(&CredentialToken::new("abc")).await.unwrap();
        assert_eq!(store.peek(), Some(CredentialToken::new("abc")));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn memory_store_ignores_blank_tokens() {
        let store = MemoryCredentialStore::with_token(CredentialToken::new("   "));
        assert!(store.load().await.unwrap().is_none());
    }
}
