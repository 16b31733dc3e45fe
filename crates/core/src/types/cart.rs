//! The cart model: an ordered list of line items, unique by product id.
//!
//! All transformations are copy-on-write: they return a new [`Cart`] and
//! leave the receiver untouched. This keeps consumers free of aliasing
//! surprises and lets the store commit a fully-built cart to storage before
//! publishing it in memory.

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::ProductId;
use super::price::Price;

/// One product entry in the cart, with a quantity.
///
/// Serializes flattened, so a line item on the wire is the catalog entry
/// plus an `amount` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The catalog entry this line refers to.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity currently in the cart. Always >= 1; a line that would reach
    /// zero is removed, never retained.
    pub amount: u32,
}

impl CartItem {
    /// Total price of this line (`unit price * amount`).
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// An ordered sequence of line items, unique by product id.
///
/// Serializes transparently as a JSON array, which is also the persisted
/// snapshot format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    /// The quantity of `product_id` currently in the cart, if present.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> Option<u32> {
        self.get(product_id).map(|item| item.amount)
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn total_amount(&self) -> u32 {
        self.items.iter().map(|item| item.amount).sum()
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .fold(Price::default(), |acc, item| acc.plus(item.line_price()))
    }

    /// A new cart with `product` merged in: the existing line's amount is
    /// incremented, or a new line with amount 1 is appended.
    #[must_use]
    pub fn with_added(&self, product: Product) -> Self {
        let mut items = self.items.clone();
        if let Some(item) = items.iter_mut().find(|item| item.product.id == product.id) {
            item.amount += 1;
        } else {
            items.push(CartItem { product, amount: 1 });
        }
        Self { items }
    }

    /// A new cart with the line for `product_id` set to exactly `amount`.
    ///
    /// Returns `None` if the product is not in the cart. The caller is
    /// responsible for having validated `amount >= 1`.
    #[must_use]
    pub fn with_amount(&self, product_id: ProductId, amount: u32) -> Option<Self> {
        self.get(product_id)?;
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.product.id == product_id {
                    item.amount = amount;
                }
                item
            })
            .collect();
        Some(Self { items })
    }

    /// A new cart with the line for `product_id` removed.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, product_id: ProductId) -> Option<Self> {
        self.get(product_id)?;
        let items = self
            .items
            .iter()
            .filter(|item| item.product.id != product_id)
            .cloned()
            .collect();
        Some(Self { items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Sneaker {id}"),
            price: Price::from_cents(9990),
            image: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    #[test]
    fn test_with_added_appends_new_line_with_amount_one() {
        let cart = Cart::empty().with_added(product(1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(1));
    }

    #[test]
    fn test_with_added_merges_existing_line() {
        let cart = Cart::empty().with_added(product(1)).with_added(product(1));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), Some(2));
    }

    #[test]
    fn test_with_added_preserves_insertion_order() {
        let cart = Cart::empty()
            .with_added(product(2))
            .with_added(product(1))
            .with_added(product(2));
        let ids: Vec<_> = cart.items().iter().map(|item| item.product.id).collect();
        assert_eq!(ids, vec![ProductId::new(2), ProductId::new(1)]);
    }

    #[test]
    fn test_with_added_does_not_mutate_receiver() {
        let original = Cart::empty().with_added(product(1));
        let _grown = original.with_added(product(1));
        assert_eq!(original.amount_of(ProductId::new(1)), Some(1));
    }

    #[test]
    fn test_with_amount_sets_exact_quantity() {
        let cart = Cart::empty().with_added(product(3));
        let updated = cart.with_amount(ProductId::new(3), 7).unwrap();
        assert_eq!(updated.amount_of(ProductId::new(3)), Some(7));
        // receiver untouched
        assert_eq!(cart.amount_of(ProductId::new(3)), Some(1));
    }

    #[test]
    fn test_with_amount_absent_product_is_none() {
        let cart = Cart::empty().with_added(product(1));
        assert!(cart.with_amount(ProductId::new(9), 2).is_none());
    }

    #[test]
    fn test_without_removes_exactly_one_line() {
        let cart = Cart::empty().with_added(product(1)).with_added(product(2));
        let updated = cart.without(ProductId::new(1)).unwrap();
        assert_eq!(updated.len(), 1);
        assert!(updated.get(ProductId::new(2)).is_some());
    }

    #[test]
    fn test_without_absent_product_is_none() {
        assert!(Cart::empty().without(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::empty()
            .with_added(product(1))
            .with_added(product(1))
            .with_added(product(2));
        assert_eq!(cart.total_amount(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(29970));
    }

    #[test]
    fn test_snapshot_wire_format_is_flat_array() {
        let cart = Cart::empty().with_added(product(1));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": 1,
                "title": "Sneaker 1",
                "price": "99.90",
                "image": "https://cdn.example.com/1.jpg",
                "amount": 1
            }])
        );
        let roundtrip: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, cart);
    }
}
