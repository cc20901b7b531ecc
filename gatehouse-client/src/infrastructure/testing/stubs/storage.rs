use std::io;

use async_trait::async_trait;
use gatehouse_model::CredentialToken;
use parking_lot::Mutex;

use crate::domains::auth::errors::StorageError;
use crate::domains::auth::storage::CredentialStore;

/// Credential store with switchable faults.
///
/// Operations that are not set to fail behave like an in-memory store.
#[derive(Debug, Default)]
pub struct FaultyCredentialStore {
    token: Mutex<Option<CredentialToken>>,
    fail_save: bool,
    fail_load: bool,
    fail_clear: bool,
}

impl FaultyCredentialStore {
    pub fn failing_save() -> Self {
        Self {
            fail_save: true,
            ..Default::default()
        }
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Default::default()
        }
    }

    pub fn failing_clear(token: CredentialToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            fail_clear: true,
            ..Default::default()
        }
    }

    pub fn peek(&self) -> Option<CredentialToken> {
        self.token.lock().clone()
    }
}

fn disk_full() -> io::Error {
    io::Error::other("no space left on device")
}

#[async_trait]
impl CredentialStore for FaultyCredentialStore {
    async fn save(&self, token: &CredentialToken) -> Result<(), StorageError> {
        if self.fail_save {
            return Err(StorageError::WriteFailed(disk_full()));
        }
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CredentialToken>, StorageError> {
        if self.fail_load {
            return Err(StorageError::ReadFailed(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        Ok(self.token.lock().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        if self.fail_clear {
            return Err(StorageError::WriteFailed(disk_full()));
        }
        *self.token.lock() = None;
        Ok(())
    }
}

/// In-memory store that yields to the scheduler before every operation,
/// the way a file store hops through the blocking pool
#[derive(Debug, Default)]
pub struct YieldingCredentialStore {
    token: Mutex<Option<CredentialToken>>,
}

impl YieldingCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn peek(&self) -> Option<CredentialToken> {
        self.token.lock().clone()
    }
}

#[async_trait]
impl CredentialStore for YieldingCredentialStore {
    async fn save(&self, token: &CredentialToken) -> Result<(), StorageError> {
        tokio::task::yield_now().await;
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<CredentialToken>, StorageError> {
        tokio::task::yield_now().await;
        Ok(self.token.lock().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        tokio::task::yield_now().await;
        *self.token.lock() = None;
        Ok(())
    }
}
