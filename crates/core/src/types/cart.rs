//! Product snapshots and cart items.
//!
//! A cart item copies the product fields it needs at the moment it is added.
//! The persisted cart therefore renders without another CMS round trip, at
//! the cost of showing the price the shopper saw when adding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// The product fields captured when a product is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// WordPress `databaseId` of the product. Identity key of a cart item.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Featured image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// A product in the cart with its quantity.
///
/// Serialized flat (`{"id", "name", "price", "image", "quantity"}`), which is
/// the layout stored in the browser slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart item, flooring the quantity at 1.
    #[must_use]
    pub fn new(product: Product, quantity: u32) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
        }
    }

    /// Product identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.amount * Decimal::from(self.quantity)
    }
}
