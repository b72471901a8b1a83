//! User records.

use serde::{Deserialize, Serialize};

/// A user record as returned by the backend.
///
/// `id` and `email` are optional because a session may fall back to a
/// minimal identity built from just the submitted username when the
/// profile endpoint is unavailable right after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned id; absent on a minimal fallback identity.
    #[serde(default)]
    pub id: Option<u64>,
    /// Account username.
    pub username: String,
    /// Contact email; absent on a minimal fallback identity.
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Builds the minimal identity used when login succeeds but the
    /// profile fetch fails.
    #[must_use]
    pub fn minimal(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
        }
    }
}

/// Response body from the register endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterReceipt {
    /// Human-readable confirmation message.
    pub message: String,
}
