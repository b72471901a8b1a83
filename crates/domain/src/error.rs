//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A comment rating is outside the accepted 1..=5 range.
    #[error("invalid rating: {0} (must be between 1 and 5)")]
    InvalidRating(u8),

    /// A required field is empty.
    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),

    /// Registration passwords do not match.
    #[error("password fields didn't match")]
    PasswordMismatch,
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
