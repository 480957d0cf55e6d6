//! Product domain types.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use bazaar_core::{CartItem, ProductId, decimal_to_amount};

/// Largest price the `NUMERIC(10, 2)` column can hold (99999999.99).
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// A catalog product row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    /// Store-assigned id.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative price with two decimal places.
    pub price: Decimal,
    /// Image path relative to the static root, or empty.
    pub image_url: String,
}

impl Product {
    /// Snapshot this product as a cart line.
    ///
    /// The price is copied as a float, so later catalog changes do not
    /// reach items already in a cart.
    #[must_use]
    pub fn to_cart_item(&self) -> CartItem {
        CartItem::new(
            self.id,
            self.name.clone(),
            decimal_to_amount(self.price),
            self.image_url.clone(),
        )
    }
}

/// A product about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

impl NewProduct {
    /// Build a product from raw admin form input.
    ///
    /// Name and description are trimmed but may be empty. The price goes
    /// through [`parse_price`], so malformed input becomes zero.
    #[must_use]
    pub fn from_form(name: &str, description: &str, price: &str, image_url: String) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            price: parse_price(price),
            image_url,
        }
    }
}

/// Coerce a submitted price into a storable decimal.
///
/// Accepts plain decimals (`12.50`) and float syntax (`1e2`). Anything that
/// is not a finite number, is negative, or does not fit the column becomes
/// zero. The result is rounded half away from zero to two places.
#[must_use]
pub fn parse_price(raw: &str) -> Decimal {
    let raw = raw.trim();
    let parsed = Decimal::from_str(raw).ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .and_then(Decimal::from_f64_retain)
    });

    match parsed {
        Some(price) => {
            let price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            if price.is_sign_negative() || price > MAX_PRICE {
                Decimal::ZERO
            } else {
                price
            }
        }
        None => Decimal::ZERO,
    }
}
