//! Persistent snapshot storage collaborator.
//!
//! Key-value semantics with a single well-known key: the value is the full
//! JSON-serialized cart, overwritten after every successful mutation. There
//! is no incremental persistence and no schema versioning; the last write
//! wins.

mod file;
mod memory;

pub use file::JsonFileStorage;
pub use memory::MemorySnapshotStorage;

use async_trait::async_trait;
use thiserror::Error;

use shoebox_core::Cart;

/// Errors that can occur while loading or saving the snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the snapshot failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load and overwrite the single persisted cart snapshot.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the persisted snapshot, or `None` if no snapshot exists yet.
    async fn load(&self) -> Result<Option<Cart>, StorageError>;

    /// Overwrite the persisted snapshot with the full serialized cart.
    async fn save(&self, cart: &Cart) -> Result<(), StorageError>;
}
