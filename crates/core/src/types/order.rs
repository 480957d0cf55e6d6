//! Checkout capture.
//!
//! An [`OrderInfo`] combines the submitted checkout form with a snapshot of
//! the cart and its total. It lives in the session only; nothing is charged
//! or persisted to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::{Cart, CartItem};

/// Checkout form fields, taken as submitted.
///
/// No field is validated. A field missing from the form is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutDetails {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
}

/// A captured order awaiting confirmation display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    /// Sum of item prices at submission time.
    pub total: f64,
    /// Cart snapshot at submission time.
    pub items: Vec<CartItem>,
    /// When the checkout form was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl OrderInfo {
    /// Capture an order from checkout details and the current cart.
    ///
    /// Returns `None` for an empty cart: an empty cart never produces an order.
    #[must_use]
    pub fn capture(
        details: CheckoutDetails,
        cart: &Cart,
        submitted_at: DateTime<Utc>,
    ) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }

        let CheckoutDetails {
            name,
            email,
            address,
            phone,
            payment_method,
        } = details;

        Some(Self {
            name,
            email,
            address,
            phone,
            payment_method,
            total: cart.total(),
            items: cart.items().to_vec(),
            submitted_at,
        })
    }

    /// Number of captured items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ProductId;

    fn cart_of(prices: &[f64]) -> Cart {
        prices
            .iter()
            .zip(1..)
            .map(|(price, id)| CartItem::new(ProductId::new(id), format!("Item {id}"), *price, ""))
            .collect()
    }

    #[test]
    fn test_capture_empty_cart_yields_none() {
        let details = CheckoutDetails {
            name: "A".to_string(),
            ..CheckoutDetails::default()
        };
        assert!(OrderInfo::capture(details, &Cart::new(), Utc::now()).is_none());
    }

    #[test]
    fn test_capture_snapshots_cart_and_total() {
        let cart = cart_of(&[10.0, 5.5]);
        let details = CheckoutDetails {
            name: "A".to_string(),
            email: "a@b.c".to_string(),
            ..CheckoutDetails::default()
        };

        let order = OrderInfo::capture(details, &cart, Utc::now()).unwrap();

        assert!((order.total - 15.5).abs() < f64::EPSILON);
        assert_eq!(order.items, cart.items());
        assert_eq!(order.name, "A");
        assert_eq!(order.email, "a@b.c");
        assert_eq!(order.address, "");
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_cart_changes() {
        let mut cart = cart_of(&[3.0]);
        let order = OrderInfo::capture(CheckoutDetails::default(), &cart, Utc::now()).unwrap();

        cart.clear();

        assert_eq!(order.item_count(), 1);
        assert!((order.total - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_details_missing_fields_default_to_empty() {
        let details: CheckoutDetails = serde_json::from_str(r#"{"name": "Ann"}"#).unwrap();
        assert_eq!(details.name, "Ann");
        assert_eq!(details.payment_method, "");
    }
}
