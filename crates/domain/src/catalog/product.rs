//! Product records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Comment;

/// A full product record from the product detail/list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Price as the backend's decimal string (e.g. `"199.99"`).
    pub price: String,
    /// Image URL, if one was uploaded.
    #[serde(default)]
    pub image: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-modified timestamp.
    pub updated_at: DateTime<Utc>,
    /// Comments embedded in the product record.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Mean of all comment ratings; 0 when there are none.
    #[serde(default)]
    pub average_rating: f64,
    /// Whether the requesting user has favorited this product.
    /// Only present on authenticated requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Compact product record used by the favorites listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Backend-assigned id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Price as a decimal string.
    pub price: String,
    /// Image URL, if any.
    #[serde(default)]
    pub image: Option<String>,
}
