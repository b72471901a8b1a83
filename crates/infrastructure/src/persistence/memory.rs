//! In-memory token storage.

use async_trait::async_trait;
use bazaar_application::StorageResult;
use bazaar_application::ports::TokenStorage;
use bazaar_domain::TokenPair;
use tokio::sync::RwLock;

/// Process-local token storage with no persistence across restarts.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    pair: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> StorageResult<Option<TokenPair>> {
        Ok(self.pair.read().await.clone())
    }

    async fn save(&self, pair: &TokenPair) -> StorageResult<()> {
        *self.pair.write().await = Some(pair.clone());
        Ok(())
    }

    async fn clear(&self) -> StorageResult<()> {
        *self.pair.write().await = None;
        Ok(())
    }
}
