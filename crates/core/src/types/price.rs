//! Price conversion and display helpers.
//!
//! Stored prices are exact decimals (`NUMERIC(10, 2)` in the database).
//! Session records carry plain `f64` amounts so they stay JSON-friendly;
//! nothing downstream settles money, so float sums are acceptable here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Convert a stored decimal price into a session amount.
///
/// Values that cannot be represented fall back to `0.0`.
#[must_use]
pub fn decimal_to_amount(price: Decimal) -> f64 {
    price.to_f64().unwrap_or(0.0)
}

/// Format a session amount for display (e.g. `$15.50`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Format a stored decimal price for display (e.g. `$15.50`).
#[must_use]
pub fn format_decimal(price: Decimal) -> String {
    format!("${:.2}", price.round_dp(2))
}
