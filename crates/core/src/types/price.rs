//! Price representation using decimal arithmetic.
//!
//! WordPress hands prices over twice: as a number used for arithmetic and as
//! a display string already formatted by WooCommerce. Both travel together so
//! the cart can sum amounts without reformatting what the CMS rendered.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A unit price as delivered by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in Vietnamese dong. Serialized as a JSON number.
    ///
    /// The number passes through `f64`, which is exact for whole amounts up
    /// to 2^53 dong. Values with more than 15 significant digits lose
    /// precision in the stored cart slot.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Display string (e.g., "125.000 ₫").
    pub formatted: String,
}

impl Price {
    /// Create a price with an explicit display string.
    #[must_use]
    pub const fn new(amount: Decimal, formatted: String) -> Self {
        Self { amount, formatted }
    }

    /// Create a price whose display string is derived with [`format_vnd`].
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        Self {
            formatted: format_vnd(amount),
            amount,
        }
    }
}

/// Format an amount as Vietnamese dong, e.g. `1250000` -> `"1.250.000 ₫"`.
///
/// Dong has no minor unit, so the amount is rounded to a whole number first.
#[must_use]
pub fn format_vnd(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = whole.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if whole.is_sign_negative() && !whole.is_zero() {
        format!("-{grouped} ₫")
    } else {
        format!("{grouped} ₫")
    }
}
