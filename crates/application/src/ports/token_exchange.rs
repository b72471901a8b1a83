//! Token exchange port

use async_trait::async_trait;
use bazaar_domain::{AuthError, Credentials, TokenPair};

/// Port for the unauthenticated token endpoints.
///
/// Implementations talk to the backend's token endpoints without any
/// bearer header — these calls must never recurse into the authenticated
/// pipeline, or a refresh could trigger itself.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchanges username/password credentials for a fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns `CredentialsRejected` when the backend refuses the login,
    /// or `Network` on transport failure.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AuthError>;

    /// Exchanges a refresh token for a new token pair.
    ///
    /// Refresh tokens are single-use: a successful exchange invalidates
    /// the token that was sent.
    ///
    /// # Errors
    ///
    /// Returns `RefreshRejected` when the backend refuses the token,
    /// or `Network` on transport failure.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}
