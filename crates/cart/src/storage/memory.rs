//! In-memory snapshot storage.

use std::sync::Mutex;

use async_trait::async_trait;

use shoebox_core::Cart;

use super::{SnapshotStorage, StorageError};

/// Holds the serialized snapshot in memory.
///
/// Keeps the same serialize-on-save / deserialize-on-load behavior as the
/// file-backed storage, so tests exercise the real wire format. Can be seeded
/// with an existing snapshot and asked to fail on demand.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    snapshot: Mutex<Option<String>>,
    fail_saves: Mutex<bool>,
}

impl MemorySnapshotStorage {
    /// Empty storage with no snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage seeded with a snapshot of `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart fails to serialize.
    pub fn with_snapshot(cart: &Cart) -> Result<Self, StorageError> {
        let storage = Self::new();
        storage.set_raw(serde_json::to_string(cart)?);
        Ok(storage)
    }

    /// Make every subsequent `save` fail with an I/O error.
    pub fn fail_saves(&self) {
        *self.fail_saves.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    /// The raw persisted snapshot, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.snapshot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn set_raw(&self, raw: String) {
        *self
            .snapshot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(raw);
    }
}

#[async_trait]
impl SnapshotStorage for MemorySnapshotStorage {
    async fn load(&self) -> Result<Option<Cart>, StorageError> {
        let raw = self.raw();
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if *self
            .fail_saves
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
        {
            return Err(StorageError::Io(std::io::Error::other(
                "save failure injected",
            )));
        }
        self.set_raw(serde_json::to_string(cart)?);
        Ok(())
    }
}
