//! Catalog and stock record types.
//!
//! These mirror the payloads served by the external catalog service. The
//! cart logic treats everything except `id` and `amount` as opaque display
//! attributes.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog entry as served by `GET products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    pub image: String,
}

/// A stock record as served by `GET stock/{id}`.
///
/// `amount` is the maximum purchasable quantity currently available; it is
/// the external source of truth consulted before every cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Catalog identifier.
    pub id: ProductId,
    /// Maximum purchasable quantity.
    pub amount: u32,
}
