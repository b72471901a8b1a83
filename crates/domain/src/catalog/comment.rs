//! Comment records and payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::error::{DomainError, DomainResult};

/// Valid rating bounds, inclusive.
const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A comment on a product, with its author expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Backend-assigned id.
    pub id: u64,
    /// The comment's author.
    pub user: User,
    /// Id of the product being commented on.
    pub product: u64,
    /// Comment body.
    pub text: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a comment.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    /// Id of the product being commented on.
    pub product: u64,
    /// Comment body.
    pub text: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
}

impl NewComment {
    /// Creates a comment payload, validating the text and rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or the rating is out of range.
    pub fn new(product: u64, text: impl Into<String>, rating: u8) -> DomainResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::EmptyField("text"));
        }
        if !RATING_RANGE.contains(&rating) {
            return Err(DomainError::InvalidRating(rating));
        }
        Ok(Self {
            product,
            text,
            rating,
        })
    }
}

/// Partial update for an existing comment. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentUpdate {
    /// Replacement body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement rating, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl CommentUpdate {
    /// Creates an update that replaces the body text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            rating: None,
        }
    }

    /// Creates an update that replaces the rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the rating is out of range.
    pub fn rating(rating: u8) -> DomainResult<Self> {
        if !RATING_RANGE.contains(&rating) {
            return Err(DomainError::InvalidRating(rating));
        }
        Ok(Self {
            text: None,
            rating: Some(rating),
        })
    }

    /// Sets the rating on an existing update.
    ///
    /// # Errors
    ///
    /// Returns an error if the rating is out of range.
    pub fn with_rating(mut self, rating: u8) -> DomainResult<Self> {
        if !RATING_RANGE.contains(&rating) {
            return Err(DomainError::InvalidRating(rating));
        }
        self.rating = Some(rating);
        Ok(self)
    }
}
