//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait that can be implemented by adapters in
//! the infrastructure layer.

mod identity_source;
mod token_exchange;
mod token_storage;

pub use identity_source::{IdentityError, IdentitySource};
pub use token_exchange::TokenExchange;
pub use token_storage::TokenStorage;
