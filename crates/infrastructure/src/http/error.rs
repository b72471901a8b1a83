//! API error types and transport error mapping.

use bazaar_domain::AuthError;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the storefront API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An auth flow failed (refresh, storage, or credentials).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend still answered 401 after the one-shot refresh retry,
    /// or an anonymous call hit an endpoint that requires identity.
    #[error("authentication required")]
    Unauthenticated,

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error detail from the response body, verbatim.
        message: String,
    },

    /// A network-level failure.
    #[error("network error: {message}")]
    Network {
        /// Error description.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Error description.
        message: String,
    },

    /// A URL could not be parsed or joined.
    #[error("invalid URL: {message}")]
    Url {
        /// Error description.
        message: String,
    },
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Maps reqwest errors onto the API error taxonomy.
pub(crate) fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout;
    }
    if error.is_decode() {
        return ApiError::Decode {
            message: error.to_string(),
        };
    }
    ApiError::Network {
        message: error.to_string(),
    }
}

/// Standard error body shape (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

/// Extracts the human-readable detail from an error body, falling back to
/// the raw body when it is not the standard shape.
pub(crate) fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorDetail>(body)
        .ok()
        .and_then(|parsed| parsed.detail)
        .unwrap_or_else(|| body.trim().to_string())
}
