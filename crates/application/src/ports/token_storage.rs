//! Token persistence port

use async_trait::async_trait;
use bazaar_domain::TokenPair;

use crate::StorageResult;

/// Port for persisting the access/refresh token pair.
///
/// This is the client's only durable state. Implementations must treat the
/// pair as a unit: `save` writes both tokens together and `clear` removes
/// both, so a reader can never observe an access token paired with a stale
/// refresh token.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Loads the stored pair, or `None` if never set or cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or parsed.
    async fn load(&self) -> StorageResult<Option<TokenPair>>;

    /// Persists both tokens atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    async fn save(&self, pair: &TokenPair) -> StorageResult<()>;

    /// Removes both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    async fn clear(&self) -> StorageResult<()>;
}
