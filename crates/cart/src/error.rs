//! Error taxonomy for cart operations.
//!
//! Two buckets: stock-insufficient is a business-rule rejection, everything
//! else is an unexpected failure that collapses to one generic user-facing
//! message per operation.

use thiserror::Error;

use shoebox_core::ProductId;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Errors raised while applying a cart operation.
///
/// These never escape the store's public operations; the store converts them
/// into notifications at the operation boundary.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity exceeds the available stock (or is not a
    /// positive quantity). Business rejection, not a fault.
    #[error("requested quantity exceeds available stock")]
    OutOfStock,

    /// The operation targets a product that has no line item in the cart.
    #[error("product {0} is not in the cart")]
    ItemNotInCart(ProductId),

    /// Catalog or stock lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the snapshot failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
