//! Favorite records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// A favorite entry as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Backend-assigned id of the favorite entry itself.
    pub id: u64,
    /// Id of the owning user.
    pub user: u64,
    /// Id of the favorited product.
    pub product: u64,
    /// When the product was favorited.
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with its full product record.
///
/// `product` is `None` when the product lookup failed; the entry is still
/// returned so the caller can show (and remove) the stale favorite.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteDetail {
    /// Id of the favorite entry.
    pub id: u64,
    /// Id of the favorited product.
    pub product_id: u64,
    /// The product record, when it could be fetched.
    pub product: Option<Product>,
    /// When the product was favorited.
    pub created_at: DateTime<Utc>,
}

/// Outcome of the product-scoped favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The product was added to the user's favorites.
    Added,
    /// The product was removed from the user's favorites.
    Removed,
}

impl FavoriteToggle {
    /// Returns true if the product is favorited after the toggle.
    #[must_use]
    pub const fn is_favorite(self) -> bool {
        matches!(self, Self::Added)
    }
}
