//! The cart store.
//!
//! Owns the in-memory cart, validates quantities against the stock record
//! before every mutation, and overwrites the persisted snapshot after every
//! successful one. Collaborators are injected at construction; there is no
//! global instance.
//!
//! # Failure policy
//!
//! Every operation catches all failures at its own boundary and converts
//! them into a user-visible notification. A stock-insufficient rejection and
//! an unexpected failure (lookup, decode, storage) surface different
//! messages, but both are terminal for that invocation: the cart and the
//! snapshot visibly do not change, and the user must re-invoke.
//!
//! # Concurrency
//!
//! Mutations are serialized behind a single async mutex held across
//! validate-and-commit, so rapid concurrent invocations cannot race on a
//! stale cart and lose updates. Catalog lookups run before the lock is
//! taken, sequentially.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

use shoebox_core::{Cart, ProductId};

use crate::catalog::CatalogApi;
use crate::error::CartError;
use crate::notify::Notifier;
use crate::storage::{SnapshotStorage, StorageError};

/// Shown when a requested quantity exceeds the available stock (or is not a
/// positive quantity).
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Shown when adding a product fails for any unexpected reason.
pub const ADD_FAILED_MESSAGE: &str = "Failed to add product";

/// Shown when removing a product fails, including removal of an absent item.
pub const REMOVE_FAILED_MESSAGE: &str = "Failed to remove product";

/// Shown when updating a product's quantity fails for any unexpected reason.
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update product quantity";

/// Input to [`CartStore::update_product_amount`]: a target absolute
/// quantity, not a delta.
#[derive(Debug, Clone, Copy)]
pub struct UpdateProductAmount {
    /// Catalog identifier of the line to update.
    pub product_id: ProductId,
    /// Target quantity. Values <= 0 are rejected as out of stock.
    pub amount: i32,
}

/// The cart state container.
///
/// Cheaply cloneable via `Arc`; all clones share the same cart, snapshot,
/// and collaborators. Construct one per running session and hand clones to
/// consumers.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Arc<dyn CatalogApi>,
    storage: Arc<dyn SnapshotStorage>,
    notifier: Arc<dyn Notifier>,
    cart: Mutex<Cart>,
}

impl CartStore {
    /// Open a store, initializing the cart from the persisted snapshot (or
    /// empty if none exists).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot cannot be read or decoded.
    pub async fn open(
        catalog: Arc<dyn CatalogApi>,
        storage: Arc<dyn SnapshotStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StorageError> {
        let cart = storage.load().await?.unwrap_or_else(Cart::empty);

        Ok(Self {
            inner: Arc::new(CartStoreInner {
                catalog,
                storage,
                notifier,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// A clone of the current cart, for consumers to read.
    pub async fn cart(&self) -> Cart {
        self.inner.cart.lock().await.clone()
    }

    /// Add one unit of `product_id` to the cart.
    ///
    /// Fetches the catalog entry and the stock record, then either merges
    /// the product into the cart (incrementing an existing line or appending
    /// a new one with amount 1) and commits, or rejects the mutation when
    /// the prospective quantity exceeds the available stock.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_add(product_id).await {
            self.reject("add_product", ADD_FAILED_MESSAGE, &err);
        }
    }

    /// Remove the line item for `product_id` from the cart.
    ///
    /// Removing a product that is not in the cart is a failure, not a no-op.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) {
        if let Err(err) = self.try_remove(product_id).await {
            self.reject("remove_product", REMOVE_FAILED_MESSAGE, &err);
        }
    }

    /// Set the line item for `update.product_id` to exactly `update.amount`.
    ///
    /// Non-positive targets and targets above the available stock are
    /// rejected as out of stock. The item must already be in the cart; this
    /// operation never inserts.
    #[instrument(skip(self), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        if let Err(err) = self.try_update(update).await {
            self.reject("update_product_amount", UPDATE_FAILED_MESSAGE, &err);
        }
    }

    async fn try_add(&self, product_id: ProductId) -> Result<(), CartError> {
        let product = self.inner.catalog.product(product_id).await?;
        let stock = self.inner.catalog.stock(product_id).await?;

        let mut cart = self.inner.cart.lock().await;

        let prospective = cart.amount_of(product_id).map_or(1, |amount| amount + 1);
        if prospective > stock.amount {
            return Err(CartError::OutOfStock);
        }

        let updated = cart.with_added(product);
        self.commit(&mut cart, updated).await
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.inner.cart.lock().await;

        let updated = cart
            .without(product_id)
            .ok_or(CartError::ItemNotInCart(product_id))?;
        self.commit(&mut cart, updated).await
    }

    async fn try_update(&self, update: UpdateProductAmount) -> Result<(), CartError> {
        // A non-positive target is rejected before any lookup, so it reports
        // out-of-stock even when the catalog service is unreachable.
        let Ok(amount) = u32::try_from(update.amount) else {
            return Err(CartError::OutOfStock);
        };
        if amount == 0 {
            return Err(CartError::OutOfStock);
        }

        let stock = self.inner.catalog.stock(update.product_id).await?;
        if amount > stock.amount {
            return Err(CartError::OutOfStock);
        }

        let mut cart = self.inner.cart.lock().await;

        let updated = cart
            .with_amount(update.product_id, amount)
            .ok_or(CartError::ItemNotInCart(update.product_id))?;
        self.commit(&mut cart, updated).await
    }

    /// Persist `updated` and only then publish it in memory, keeping the
    /// snapshot equal to the last committed cart on every path.
    async fn commit(&self, current: &mut Cart, updated: Cart) -> Result<(), CartError> {
        self.inner.storage.save(&updated).await?;
        *current = updated;
        Ok(())
    }

    /// Convert a failed mutation into a user-visible notification.
    fn reject(&self, operation: &str, failure_message: &str, err: &CartError) {
        match err {
            CartError::OutOfStock => {
                tracing::debug!(operation, "mutation rejected: insufficient stock");
                self.inner.notifier.error(OUT_OF_STOCK_MESSAGE);
            }
            err => {
                tracing::warn!(operation, error = %err, "cart operation failed");
                self.inner.notifier.error(failure_message);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use shoebox_core::{Price, Product, Stock};

    use crate::catalog::CatalogError;
    use crate::notify::RecordingNotifier;
    use crate::storage::MemorySnapshotStorage;

    /// Catalog backed by fixed maps, with a switch to simulate an outage.
    #[derive(Default)]
    struct FakeCatalog {
        products: HashMap<ProductId, Product>,
        stock: HashMap<ProductId, u32>,
        down: AtomicBool,
    }

    impl FakeCatalog {
        fn with_entries(entries: &[(i32, u32)]) -> Self {
            let mut catalog = Self::default();
            for &(id, stock) in entries {
                catalog.products.insert(ProductId::new(id), product(id));
                catalog.stock.insert(ProductId::new(id), stock);
            }
            catalog
        }

        fn go_down(&self) {
            self.down.store(true, Ordering::SeqCst);
        }

        fn check_up(&self) -> Result<(), CatalogError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(CatalogError::Status {
                    status: 503,
                    body: "service unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
            self.check_up()?;
            self.products
                .get(&id)
                .cloned()
                .ok_or(CatalogError::NotFound(id))
        }

        async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
            self.check_up()?;
            self.stock
                .get(&id)
                .map(|&amount| Stock { id, amount })
                .ok_or(CatalogError::NotFound(id))
        }
    }

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Sneaker {id}"),
            price: Price::from_cents(9990),
            image: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    struct Harness {
        store: CartStore,
        catalog: Arc<FakeCatalog>,
        storage: Arc<MemorySnapshotStorage>,
        notifier: Arc<RecordingNotifier>,
    }

    impl Harness {
        async fn new(entries: &[(i32, u32)]) -> Self {
            Self::with_storage(entries, Arc::new(MemorySnapshotStorage::new())).await
        }

        async fn with_storage(
            entries: &[(i32, u32)],
            storage: Arc<MemorySnapshotStorage>,
        ) -> Self {
            let catalog = Arc::new(FakeCatalog::with_entries(entries));
            let notifier = Arc::new(RecordingNotifier::new());
            let store = CartStore::open(catalog.clone(), storage.clone(), notifier.clone())
                .await
                .unwrap();
            Self {
                store,
                catalog,
                storage,
                notifier,
            }
        }

        /// The persisted snapshot must deserialize to a value deep-equal to
        /// the in-memory cart.
        async fn assert_snapshot_matches_cart(&self) {
            let persisted = self.storage.load().await.unwrap().unwrap();
            assert_eq!(persisted, self.store.cart().await);
        }
    }

    #[tokio::test]
    async fn test_add_new_product_with_stock_available() {
        let h = Harness::new(&[(1, 5)]).await;

        h.store.add_product(ProductId::new(1)).await;

        let cart = h.store.cart().await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));
        assert!(h.notifier.messages().is_empty());
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_amount() {
        let h = Harness::new(&[(1, 5)]).await;

        h.store.add_product(ProductId::new(1)).await;
        h.store.add_product(ProductId::new(1)).await;

        let cart = h.store.cart().await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(2));
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_add_at_stock_ceiling_rejects_and_leaves_cart_unchanged() {
        let h = Harness::new(&[(1, 5)]).await;
        for _ in 0..5 {
            h.store.add_product(ProductId::new(1)).await;
        }
        assert!(h.notifier.messages().is_empty());

        // Sixth add would exceed stock(1) = 5
        h.store.add_product(ProductId::new(1)).await;

        assert_eq!(h.store.cart().await.amount_of(ProductId::new(1)), Some(5));
        assert_eq!(h.notifier.last().as_deref(), Some(OUT_OF_STOCK_MESSAGE));
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_rejects() {
        let h = Harness::new(&[(1, 0)]).await;

        h.store.add_product(ProductId::new(1)).await;

        assert!(h.store.cart().await.is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(OUT_OF_STOCK_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_unknown_product_notifies_generic_failure() {
        let h = Harness::new(&[(1, 5)]).await;

        h.store.add_product(ProductId::new(99)).await;

        assert!(h.store.cart().await.is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(ADD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_during_catalog_outage_notifies_generic_failure() {
        let h = Harness::new(&[(1, 5)]).await;
        h.catalog.go_down();

        h.store.add_product(ProductId::new(1)).await;

        assert!(h.store.cart().await.is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(ADD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_with_storage_failure_commits_nothing() {
        let h = Harness::new(&[(1, 5)]).await;
        h.storage.fail_saves();

        h.store.add_product(ProductId::new(1)).await;

        assert!(h.store.cart().await.is_empty());
        assert!(h.storage.raw().is_none());
        assert_eq!(h.notifier.last().as_deref(), Some(ADD_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_remove_present_product_removes_exactly_that_line() {
        let h = Harness::new(&[(1, 5), (2, 5)]).await;
        h.store.add_product(ProductId::new(1)).await;
        h.store.add_product(ProductId::new(2)).await;

        h.store.remove_product(ProductId::new(1)).await;

        let cart = h.store.cart().await;
        assert_eq!(cart.len(), 1);
        assert!(cart.get(ProductId::new(2)).is_some());
        assert!(h.notifier.messages().is_empty());
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_remove_only_product_empties_cart() {
        let h = Harness::new(&[(2, 5)]).await;
        for _ in 0..3 {
            h.store.add_product(ProductId::new(2)).await;
        }

        h.store.remove_product(ProductId::new(2)).await;

        assert!(h.store.cart().await.is_empty());
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_remove_absent_product_never_mutates_and_notifies() {
        let h = Harness::new(&[(1, 5)]).await;
        h.store.add_product(ProductId::new(1)).await;

        h.store.remove_product(ProductId::new(42)).await;

        assert_eq!(h.store.cart().await.len(), 1);
        assert_eq!(h.notifier.last().as_deref(), Some(REMOVE_FAILED_MESSAGE));
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let h = Harness::new(&[(3, 10)]).await;
        h.store.add_product(ProductId::new(3)).await;
        h.store.add_product(ProductId::new(3)).await;

        h.store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(3),
                amount: 7,
            })
            .await;

        assert_eq!(h.store.cart().await.amount_of(ProductId::new(3)), Some(7));
        assert!(h.notifier.messages().is_empty());
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_update_with_non_positive_amount_rejects_before_any_lookup() {
        let h = Harness::new(&[(1, 5)]).await;
        h.store.add_product(ProductId::new(1)).await;
        // Even with the catalog unreachable, a non-positive target must
        // report out-of-stock, not a lookup failure.
        h.catalog.go_down();

        for amount in [0, -1] {
            h.store
                .update_product_amount(UpdateProductAmount {
                    product_id: ProductId::new(1),
                    amount,
                })
                .await;
            assert_eq!(h.notifier.last().as_deref(), Some(OUT_OF_STOCK_MESSAGE));
        }

        assert_eq!(h.store.cart().await.amount_of(ProductId::new(1)), Some(1));
    }

    #[tokio::test]
    async fn test_update_above_stock_rejects_and_leaves_cart_unchanged() {
        let h = Harness::new(&[(1, 5)]).await;
        h.store.add_product(ProductId::new(1)).await;

        h.store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(1),
                amount: 6,
            })
            .await;

        assert_eq!(h.store.cart().await.amount_of(ProductId::new(1)), Some(1));
        assert_eq!(h.notifier.last().as_deref(), Some(OUT_OF_STOCK_MESSAGE));
        h.assert_snapshot_matches_cart().await;
    }

    #[tokio::test]
    async fn test_update_absent_product_notifies_update_failure() {
        let h = Harness::new(&[(1, 5)]).await;

        h.store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(1),
                amount: 2,
            })
            .await;

        assert!(h.store.cart().await.is_empty());
        assert_eq!(h.notifier.last().as_deref(), Some(UPDATE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_update_during_catalog_outage_notifies_update_failure() {
        let h = Harness::new(&[(1, 5)]).await;
        h.store.add_product(ProductId::new(1)).await;
        h.catalog.go_down();

        h.store
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(1),
                amount: 2,
            })
            .await;

        assert_eq!(h.store.cart().await.amount_of(ProductId::new(1)), Some(1));
        assert_eq!(h.notifier.last().as_deref(), Some(UPDATE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_open_restores_persisted_snapshot() {
        let first = Harness::new(&[(1, 5)]).await;
        first.store.add_product(ProductId::new(1)).await;
        first.store.add_product(ProductId::new(1)).await;

        let second = Harness::with_storage(&[(1, 5)], first.storage.clone()).await;

        assert_eq!(second.store.cart().await, first.store.cart().await);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialized() {
        let h = Harness::new(&[(1, 5)]).await;

        let (a, b) = (h.store.clone(), h.store.clone());
        tokio::join!(
            a.add_product(ProductId::new(1)),
            b.add_product(ProductId::new(1)),
        );

        // Without serialized mutations one of the two adds could be lost.
        assert_eq!(h.store.cart().await.amount_of(ProductId::new(1)), Some(2));
        assert!(h.notifier.messages().is_empty());
        h.assert_snapshot_matches_cart().await;
    }
}
