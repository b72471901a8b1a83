//! File-backed token storage.
//!
//! The pair is stored as one JSON document under the same fixed keys the
//! browser client uses in local storage:
//!
//! ```json
//! {
//!   "token": "<access token>",
//!   "refreshToken": "<refresh token>"
//! }
//! ```
//!
//! Writing one document keeps the pair atomic: a reader can never see a
//! new access token next to an old refresh token.

use std::path::PathBuf;

use async_trait::async_trait;
use bazaar_application::ports::TokenStorage;
use bazaar_application::{StorageError, StorageResult};
use bazaar_domain::TokenPair;
use serde::{Deserialize, Serialize};

/// On-disk document shape.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTokens {
    token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

impl From<&TokenPair> for StoredTokens {
    fn from(pair: &TokenPair) -> Self {
        Self {
            token: pair.access.clone(),
            refresh_token: pair.refresh.clone(),
        }
    }
}

impl From<StoredTokens> for TokenPair {
    fn from(stored: StoredTokens) -> Self {
        Self {
            access: stored.token,
            refresh: stored.refresh_token,
        }
    }
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates a store writing to the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> StorageResult<Option<TokenPair>> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StorageError::Io(error)),
        };
        let stored: StoredTokens = serde_json::from_slice(&content)
            .map_err(|error| StorageError::Serialization(error.to_string()))?;
        Ok(Some(stored.into()))
    }

    async fn save(&self, pair: &TokenPair) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_vec_pretty(&StoredTokens::from(pair))
            .map_err(|error| StorageError::Serialization(error.to_string()))?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StorageError::Io(error)),
        }
    }
}
