//! Token store over the persistence port.
//!
//! Thin pair-atomic wrapper: every read and write goes through the
//! `TokenStorage` port, and storage failures are folded into `AuthError`
//! so auth flows have a single error type.

use std::sync::Arc;

use bazaar_domain::{AuthError, TokenPair};

use crate::StorageError;
use crate::ports::TokenStorage;

/// Pair-atomic token store.
///
/// Cheap to clone; clones share the same backing storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn TokenStorage>,
}

impl TokenStore {
    /// Creates a store over the given persistence adapter.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// Reads the persisted pair; `None` if never set or cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backing store fails.
    pub async fn get(&self) -> Result<Option<TokenPair>, AuthError> {
        self.storage.load().await.map_err(into_auth_error)
    }

    /// Persists both tokens together.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backing store fails.
    pub async fn set(&self, pair: &TokenPair) -> Result<(), AuthError> {
        self.storage.save(pair).await.map_err(into_auth_error)
    }

    /// Removes both tokens; used on logout or unrecoverable refresh failure.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backing store fails.
    pub async fn clear(&self) -> Result<(), AuthError> {
        self.storage.clear().await.map_err(into_auth_error)
    }

    /// Reads the current access token, if a pair is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backing store fails.
    pub async fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self.get().await?.map(|pair| pair.access))
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

fn into_auth_error(error: StorageError) -> AuthError {
    AuthError::Storage {
        message: error.to_string(),
    }
}
