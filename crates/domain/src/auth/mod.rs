//! Authentication types for the Bazaar client.
//!
//! This module provides:
//! - The access/refresh token pair exchanged with the backend
//! - JWT expiry decoding with a fixed skew buffer
//! - Credential and registration payloads

mod expiry;
mod types;

pub use expiry::{EXPIRY_SKEW_SECONDS, decode_expiry, is_expired, is_expired_with_skew};
pub use types::{AuthError, Credentials, Registration, TokenPair};
