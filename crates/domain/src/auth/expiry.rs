//! JWT expiry decoding.
//!
//! The backend issues JWT access tokens with an embedded `exp` claim.
//! Expiry is derived on demand from the token string; nothing here
//! validates signatures — the backend does that. A token that cannot
//! be decoded is treated as already expired.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Buffer subtracted from a token's nominal expiry to absorb the latency
/// between the local check and the request's arrival at the backend.
pub const EXPIRY_SKEW_SECONDS: i64 = 30;

/// The subset of JWT claims the client cares about.
#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Decodes the `exp` claim from a JWT access token.
///
/// Returns `None` if the token is malformed in any way: not three
/// dot-separated segments, payload not valid base64url, payload not JSON,
/// or no `exp` claim.
#[must_use]
pub fn decode_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

/// Checks whether a token is expired, using the default skew buffer.
///
/// Fail-safe: a token whose expiry cannot be decoded counts as expired.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_with_skew(token, EXPIRY_SKEW_SECONDS)
}

/// Checks whether a token is expired within `skew_seconds` of now.
#[must_use]
pub fn is_expired_with_skew(token: &str, skew_seconds: i64) -> bool {
    decode_expiry(token).is_none_or(|expires_at| {
        let skew = chrono::Duration::seconds(skew_seconds);
        Utc::now() + skew >= expires_at
    })
}
