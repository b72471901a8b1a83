//! Token pair, credential payloads, and auth errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DomainError, DomainResult};

/// An access/refresh token pair as issued by the backend.
///
/// The two tokens travel together: a successful refresh replaces the whole
/// pair, and the pair is always persisted or cleared as a unit so the
/// stored credentials can never get out of step with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential with an embedded expiry claim.
    pub access: String,
    /// Longer-lived credential used solely to mint new access tokens.
    pub refresh: String,
}

impl TokenPair {
    /// Creates a token pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Checks whether the access token is expired (with the default skew).
    #[must_use]
    pub fn access_is_expired(&self) -> bool {
        super::is_expired(&self.access)
    }
}

/// Username/password credentials for the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password, sent verbatim to the backend.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials payload.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Registration payload for the register endpoint.
///
/// The backend re-validates everything; the constructor only rejects what
/// would be a guaranteed round-trip failure.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Contact email (required by the backend).
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub password2: String,
}

impl Registration {
    /// Creates a registration payload, checking the confirmation field.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is empty or the passwords differ.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password2: impl Into<String>,
    ) -> DomainResult<Self> {
        let registration = Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            password2: password2.into(),
        };
        if registration.username.is_empty() {
            return Err(DomainError::EmptyField("username"));
        }
        if registration.email.is_empty() {
            return Err(DomainError::EmptyField("email"));
        }
        if registration.password != registration.password2 {
            return Err(DomainError::PasswordMismatch);
        }
        Ok(registration)
    }
}

/// Authentication errors.
///
/// `Clone` so a single refresh outcome can settle every queued waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No refresh token is stored; the session cannot be renewed.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The backend rejected the refresh token (invalid/expired/revoked).
    #[error("refresh rejected: {message}")]
    RefreshRejected {
        /// Error description from the backend.
        message: String,
    },

    /// The backend rejected the supplied username/password.
    #[error("credentials rejected: {message}")]
    CredentialsRejected {
        /// Error description, surfaced verbatim to the login form.
        message: String,
    },

    /// A network-level failure during a token exchange.
    #[error("network error: {message}")]
    Network {
        /// Error description.
        message: String,
    },

    /// The token exchange did not settle within the bounded timeout.
    #[error("token exchange timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// Reading or writing the persisted token pair failed.
    #[error("token storage error: {message}")]
    Storage {
        /// Error description.
        message: String,
    },
}
