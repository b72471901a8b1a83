//! Authentication logic for the Bazaar client.
//!
//! This module provides:
//! - Pair-atomic token storage with expiry checks
//! - The single-flight refresh coordinator

mod refresh;
mod token_store;

pub use refresh::{DEFAULT_EXCHANGE_TIMEOUT, RefreshCoordinator};
pub use token_store::TokenStore;
