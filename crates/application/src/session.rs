//! Session and identity cache.
//!
//! The session owns the resolved user identity. Views only read it; every
//! mutation goes through `initialize`, `login`, or `logout`.

use std::sync::Arc;

use bazaar_domain::{AuthError, Credentials, User};
use tokio::sync::RwLock;

use crate::auth::{RefreshCoordinator, TokenStore};
use crate::ports::{IdentitySource, TokenExchange};

/// The current session: persisted tokens plus the cached user identity.
pub struct Session {
    store: TokenStore,
    coordinator: Arc<RefreshCoordinator>,
    exchange: Arc<dyn TokenExchange>,
    identity: Arc<dyn IdentitySource>,
    user: RwLock<Option<User>>,
}

impl Session {
    /// Creates a session from its collaborators.
    #[must_use]
    pub fn new(
        store: TokenStore,
        coordinator: Arc<RefreshCoordinator>,
        exchange: Arc<dyn TokenExchange>,
        identity: Arc<dyn IdentitySource>,
    ) -> Self {
        Self {
            store,
            coordinator,
            exchange,
            identity,
            user: RwLock::new(None),
        }
    }

    /// Resolves the session on startup.
    ///
    /// If a token pair is stored: refresh proactively when the access token
    /// is expired, then fetch the user profile. Any failure along the way
    /// leaves the session unauthenticated — this never returns an error.
    pub async fn initialize(&self) {
        let pair = match self.store.get().await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                tracing::debug!("no stored tokens, starting anonymous");
                self.set_user(None).await;
                return;
            }
            Err(error) => {
                tracing::warn!(%error, "token store unreadable, starting anonymous");
                self.set_user(None).await;
                return;
            }
        };

        if pair.access_is_expired() {
            if let Err(error) = self.coordinator.acquire_fresh_token().await {
                tracing::warn!(%error, "startup refresh failed, starting anonymous");
                self.set_user(None).await;
                return;
            }
        }

        match self.identity.current_user().await {
            Ok(user) => {
                tracing::debug!(username = %user.username, "session resolved");
                self.set_user(Some(user)).await;
            }
            Err(error) => {
                tracing::warn!(%error, "profile fetch failed, starting anonymous");
                self.set_user(None).await;
            }
        }
    }

    /// Logs in with username/password credentials.
    ///
    /// On a successful credential exchange the pair is persisted and the
    /// profile is fetched. A failed profile fetch does not fail the login:
    /// the cached identity falls back to a minimal record carrying the
    /// submitted username.
    ///
    /// # Errors
    ///
    /// Returns the exchange's error when the backend rejects the
    /// credentials, or a storage error if the pair cannot be persisted.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let credentials = Credentials::new(username, password);
        let pair = self.exchange.login(&credentials).await?;
        self.store.set(&pair).await?;

        let user = match self.identity.current_user().await {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(%error, "profile fetch failed after login, using minimal identity");
                User::minimal(username)
            }
        };

        self.set_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Logs out: clears the stored pair and the cached identity. No
    /// network call is involved.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the pair cannot be cleared; the cached
    /// identity is dropped regardless.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let cleared = self.store.clear().await;
        self.set_user(None).await;
        cleared
    }

    /// The cached identity, if the session is authenticated.
    ///
    /// The identity is only as alive as the tokens backing it: when the
    /// pair has been cleared (logout elsewhere, terminal refresh failure),
    /// the cache is dropped and `None` is returned.
    pub async fn current_user(&self) -> Option<User> {
        if matches!(self.store.get().await, Ok(Some(_))) {
            return self.user.read().await.clone();
        }
        let mut user = self.user.write().await;
        if user.is_some() {
            tracing::debug!("tokens gone, dropping cached identity");
            *user = None;
        }
        None
    }

    /// Returns true if the session holds a live identity.
    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    async fn set_user(&self, user: Option<User>) {
        *self.user.write().await = user;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use async_trait::async_trait;
    use bazaar_domain::TokenPair;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageResult;
    use crate::ports::{IdentityError, TokenStorage};

    #[derive(Default)]
    struct FakeStorage {
        pair: RwLock<Option<TokenPair>>,
    }

    #[async_trait]
    impl TokenStorage for FakeStorage {
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

    struct FakeExchange {
        login_outcome: Result<TokenPair, AuthError>,
    }

    #[async_trait]
    impl TokenExchange for FakeExchange {
        async fn login(&self, _credentials: &Credentials) -> Result<TokenPair, AuthError> {
            self.login_outcome.clone()
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<TokenPair, AuthError> {
            Err(AuthError::RefreshRejected {
                message: "unexpected refresh".to_string(),
            })
        }
    }

    struct FakeIdentity {
        outcome: Result<User, IdentityError>,
    }

    #[async_trait]
    impl IdentitySource for FakeIdentity {
        async fn current_user(&self) -> Result<User, IdentityError> {
            self.outcome.clone()
        }
    }

    fn session_with(
        storage: Arc<FakeStorage>,
        login_outcome: Result<TokenPair, AuthError>,
        identity_outcome: Result<User, IdentityError>,
    ) -> Session {
        let store = TokenStore::new(storage);
        let exchange = Arc::new(FakeExchange { login_outcome });
        let coordinator = Arc::new(RefreshCoordinator::new(store.clone(), exchange.clone()));
        Session::new(
            store,
            coordinator,
            exchange,
            Arc::new(FakeIdentity {
                outcome: identity_outcome,
            }),
        )
    }

    fn full_user() -> User {
        User {
            id: Some(7),
            username: "alice".to_string(),
            email: Some("alice@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_caches_profile() {
        let storage = Arc::new(FakeStorage::default());
        let session = session_with(
            storage.clone(),
            Ok(TokenPair::new("access", "refresh")),
            Ok(full_user()),
        );

        let user = session.login("alice", "secret").await.unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(session.current_user().await, Some(full_user()));
        assert!(storage.pair.read().await.is_some());
    }

    #[tokio::test]
    async fn test_login_lenient_on_profile_failure() {
        let session = session_with(
            Arc::new(FakeStorage::default()),
            Ok(TokenPair::new("access", "refresh")),
            Err(IdentityError::new("profile endpoint is down")),
        );

        let user = session.login("alice", "secret").await.unwrap();
        assert_eq!(user, User::minimal("alice"));
        assert!(session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_propagates_credential_rejection() {
        let session = session_with(
            Arc::new(FakeStorage::default()),
            Err(AuthError::CredentialsRejected {
                message: "no active account".to_string(),
            }),
            Ok(full_user()),
        );

        let error = session.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(error, AuthError::CredentialsRejected { .. }));
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_and_identity() {
        let storage = Arc::new(FakeStorage::default());
        let session = session_with(
            storage.clone(),
            Ok(TokenPair::new("access", "refresh")),
            Ok(full_user()),
        );

        session.login("alice", "secret").await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(session.current_user().await, None);
        assert!(storage.pair.read().await.is_none());
    }

    #[tokio::test]
    async fn test_initialize_without_tokens_stays_anonymous() {
        let session = session_with(
            Arc::new(FakeStorage::default()),
            Ok(TokenPair::new("access", "refresh")),
            Ok(full_user()),
        );

        session.initialize().await;
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_initialize_with_expired_token_and_failing_refresh() {
        let storage = Arc::new(FakeStorage::default());
        // A malformed access token counts as expired, forcing the refresh
        // path, and the fake exchange rejects every refresh.
        *storage.pair.write().await = Some(TokenPair::new("expired-garbage", "refresh"));
        let session = session_with(
            storage.clone(),
            Ok(TokenPair::new("access", "refresh")),
            Ok(full_user()),
        );

        session.initialize().await;
        assert!(!session.is_authenticated().await);
        // The failed refresh cleared the pair.
        assert!(storage.pair.read().await.is_none());
    }

    /// A syntactically valid JWT expiring an hour from now, so initialize
    /// takes the profile-fetch path rather than the refresh path.
    fn live_access_token() -> String {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            + 3600;
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    #[tokio::test]
    async fn test_initialize_profile_failure_stays_anonymous() {
        let storage = Arc::new(FakeStorage::default());
        *storage.pair.write().await = Some(TokenPair::new(live_access_token(), "refresh"));
        let session = session_with(
            storage,
            Ok(TokenPair::new("access", "refresh")),
            Err(IdentityError::new("profile endpoint is down")),
        );

        session.initialize().await;
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_identity_dropped_when_tokens_cleared_elsewhere() {
        let storage = Arc::new(FakeStorage::default());
        let session = session_with(
            storage.clone(),
            Ok(TokenPair::new(live_access_token(), "refresh")),
            Ok(full_user()),
        );

        session.login("alice", "secret").await.unwrap();
        assert!(session.is_authenticated().await);

        // A terminal refresh failure clears the pair behind the session's
        // back; the cached identity must not outlive it.
        *storage.pair.write().await = None;
        assert_eq!(session.current_user().await, None);
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_initialize_with_valid_token_resolves_user() {
        let storage = Arc::new(FakeStorage::default());
        *storage.pair.write().await = Some(TokenPair::new(live_access_token(), "refresh"));
        let session = session_with(
            storage,
            Ok(TokenPair::new("access", "refresh")),
            Ok(full_user()),
        );

        session.initialize().await;
        assert_eq!(session.current_user().await, Some(full_user()));
    }
}
