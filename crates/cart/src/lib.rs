//! Shoebox cart library.
//!
//! Owns an ordered collection of cart line items, persists the full cart to
//! a local JSON snapshot after every successful mutation, and consults an
//! external stock-availability endpoint to enforce quantity ceilings before
//! mutating state.
//!
//! # Architecture
//!
//! [`store::CartStore`] is the single component; its collaborators are
//! injected explicitly (no global singleton):
//!
//! - [`catalog::CatalogApi`] - product and stock lookup
//! - [`storage::SnapshotStorage`] - single-key persisted snapshot
//! - [`notify::Notifier`] - fire-and-forget user-facing error messages
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shoebox_cart::{catalog::HttpCatalogClient, config::CartConfig,
//!     notify::TracingNotifier, storage::JsonFileStorage, store::CartStore};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::open(
//!     Arc::new(HttpCatalogClient::new(&config)?),
//!     Arc::new(JsonFileStorage::new(&config.snapshot_path)),
//!     Arc::new(TracingNotifier),
//! )
//! .await?;
//!
//! store.add_product(1.into()).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use error::CartError;
pub use store::{CartStore, UpdateProductAmount};
