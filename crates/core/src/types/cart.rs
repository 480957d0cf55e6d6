//! Session cart: an ordered list of product snapshots.
//!
//! A cart is append-only from the shopper's side: adding the same product
//! twice yields two separate items, and removal takes out the earliest match
//! only. Items are snapshots, so later catalog price changes do not reach
//! items already in a cart.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product snapshot taken when it was added to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product id at the time of the add.
    pub id: ProductId,
    /// Product name at the time of the add.
    pub name: String,
    /// Price snapshot. Missing in a stored session record means `0.0`.
    #[serde(default)]
    pub price: f64,
    /// Image path relative to the static root, or empty.
    #[serde(default)]
    pub image_url: String,
}

impl CartItem {
    /// Create a new cart item snapshot.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image_url: image_url.into(),
        }
    }
}

/// The ordered sequence of items held in a shopper's session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item at the end, even if the same product is already present.
    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove the first item whose id matches.
    ///
    /// Later items with the same id stay in place. Returns whether an item
    /// was removed.
    pub fn remove_first(&mut self, id: ProductId) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sum of item prices.
    #[must_use]
    pub fn total(&self) -> f64 {
        compute_total(&self.items)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of items (duplicates counted separately).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Plain floating-point sum of item prices. An empty slice totals `0.0`.
#[must_use]
pub fn compute_total(items: &[CartItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i32, price: f64) -> CartItem {
        CartItem::new(ProductId::new(id), format!("Product {id}"), price, "")
    }

    #[test]
    fn test_push_allows_duplicates() {
        let mut cart = Cart::new();
        cart.push(item(1, 10.0));
        cart.push(item(1, 10.0));

        assert_eq!(cart.len(), 2);
        assert!(cart.items().iter().all(|i| i.id == ProductId::new(1)));
    }

    #[test]
    fn test_remove_first_only_takes_earliest_match() {
        let mut cart = Cart::new();
        cart.push(CartItem::new(ProductId::new(1), "first", 10.0, ""));
        cart.push(item(2, 3.0));
        cart.push(CartItem::new(ProductId::new(1), "second", 12.0, ""));

        assert!(cart.remove_first(ProductId::new(1)));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id, ProductId::new(2));
        assert_eq!(cart.items()[1].name, "second");
    }

    #[test]
    fn test_remove_first_absent_id_leaves_cart_unchanged() {
        let mut cart: Cart = [item(1, 1.0), item(2, 2.0)].into_iter().collect();
        let before = cart.clone();

        assert!(!cart.remove_first(ProductId::new(99)));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_first_on_empty_cart() {
        let mut cart = Cart::new();
        assert!(!cart.remove_first(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_compute_total() {
        assert!(compute_total(&[]).abs() < f64::EPSILON);
        assert!((compute_total(&[item(1, 10.0), item(2, 5.5)]) - 15.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cart_total_matches_items() {
        let cart: Cart = [item(1, 1.25), item(1, 1.25), item(3, 2.5)]
            .into_iter()
            .collect();
        assert!((cart.total() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear() {
        let mut cart: Cart = [item(1, 1.0)].into_iter().collect();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total().abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_json_shape() {
        let cart: Cart = [CartItem::new(ProductId::new(4), "Mug", 8.5, "uploads/mug.png")]
            .into_iter()
            .collect();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 4, "name": "Mug", "price": 8.5, "image_url": "uploads/mug.png"}
            ])
        );
    }

    #[test]
    fn test_missing_price_deserializes_as_zero() {
        let cart: Cart = serde_json::from_str(r#"[{"id": 1, "name": "Old"}]"#).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.items()[0].price.abs() < f64::EPSILON);
        assert_eq!(cart.items()[0].image_url, "");
    }
}
