//! Bazaar Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: reqwest-backed HTTP adapters for the storefront
//! backend and token persistence.

pub mod http;
pub mod persistence;
pub mod storefront;

pub use http::{ApiError, ApiResult, ClientConfig, HttpTokenExchange, StorefrontClient};
pub use persistence::{FileTokenStorage, MemoryTokenStorage};
pub use storefront::Storefront;
