//! HTTP adapters for the storefront backend.
//!
//! Two reqwest clients mirror the two hosts of the browser client: an
//! anonymous one for the token endpoints (`HttpTokenExchange`) and an
//! authenticated one carrying the bearer pipeline (`StorefrontClient`).

mod client;
mod config;
mod error;
mod exchange;

pub use client::StorefrontClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use exchange::HttpTokenExchange;
