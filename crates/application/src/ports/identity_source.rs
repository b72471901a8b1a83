//! Identity source port

use async_trait::async_trait;
use bazaar_domain::User;
use thiserror::Error;

/// Error from a profile fetch.
///
/// The session treats every identity failure the same way (fall back or
/// stay anonymous), so the port collapses the transport's error detail
/// into a message.
#[derive(Debug, Clone, Error)]
#[error("profile fetch failed: {message}")]
pub struct IdentityError {
    /// Error description.
    pub message: String,
}

impl IdentityError {
    /// Creates an identity error from any displayable cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Port for resolving the current user's profile.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Fetches the profile of the user the stored tokens belong to.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile endpoint cannot be reached or the
    /// tokens do not resolve to a user.
    async fn current_user(&self) -> Result<User, IdentityError>;
}
