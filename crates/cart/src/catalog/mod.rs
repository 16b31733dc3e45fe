//! Catalog and stock lookup collaborator.
//!
//! Two read-only operations against the external catalog service: fetch a
//! product's display attributes, and fetch its stock record. Transport and
//! error shape are opaque to the cart logic beyond "may fail".

mod http;

pub use http::HttpCatalogClient;

use async_trait::async_trait;
use thiserror::Error;

use shoebox_core::{Product, ProductId, Stock};

/// Errors that can occur when querying the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No catalog entry or stock record for the given id.
    #[error("not found: product {0}")]
    NotFound(ProductId),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body, for diagnostics.
        body: String,
    },
}

/// Read-only product and stock lookup.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the catalog entry for `id`.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Fetch the stock record for `id`.
    ///
    /// Stock is the external source of truth for the maximum purchasable
    /// quantity and must be re-read before every mutation; implementations
    /// must not cache it.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;
}
