//! Bazaar Domain - Core storefront types
//!
//! This crate defines the domain model for the Bazaar storefront client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod catalog;
pub mod error;

pub use auth::{
    AuthError, Credentials, EXPIRY_SKEW_SECONDS, Registration, TokenPair, decode_expiry,
    is_expired, is_expired_with_skew,
};
pub use catalog::{
    Comment, CommentUpdate, Favorite, FavoriteDetail, FavoriteToggle, NewComment, Page, Product,
    ProductSummary, RegisterReceipt, User,
};
pub use error::{DomainError, DomainResult};
