//! Bazaar Application - Auth and session logic
//!
//! This crate holds the client's behavioral core: the pair-atomic token
//! store, the single-flight refresh coordinator, and the session identity
//! cache. It depends only on ports; the infrastructure crate supplies the
//! HTTP and persistence adapters.

pub mod auth;
pub mod error;
pub mod ports;
pub mod session;

pub use auth::{DEFAULT_EXCHANGE_TIMEOUT, RefreshCoordinator, TokenStore};
pub use error::{StorageError, StorageResult};
pub use session::Session;
