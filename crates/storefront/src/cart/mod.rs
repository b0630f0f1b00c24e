//! Shopper cart state container.
//!
//! The cart lives on the shopper's device: the store is opened once per
//! session from a durable slot, every change to the items is written back
//! immediately, and checkout clears it. Nothing else writes the items; all
//! mutation goes through [`CartStore`].
//!
//! # Example
//!
//! ```rust
//! use dainam_core::{Price, Product, ProductId};
//! use dainam_storefront::cart::{CartStore, MemoryStorage};
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::open(MemoryStorage::new());
//! let product = Product {
//!     id: ProductId::new(7),
//!     name: "Ngói màu".to_string(),
//!     price: Price::from_amount(Decimal::new(12_000, 0)),
//!     image: None,
//! };
//!
//! cart.add_to_cart(product.clone(), 1);
//! cart.add_to_cart(product, 1);
//! assert_eq!(cart.items().len(), 1);
//! assert_eq!(cart.items_count(), 2);
//! assert!(cart.is_drawer_open());
//! ```

pub mod storage;

use dainam_core::{CartItem, OrderLine, Product, ProductId, format_vnd};
use rust_decimal::Decimal;
use tracing::{debug, warn};

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "dainam_cart";

/// The shopper's cart.
///
/// Items keep insertion order and hold at most one entry per product.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    items: Vec<CartItem>,
    drawer_open: bool,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart for a session, hydrating it from `storage`.
    ///
    /// A missing slot yields an empty cart. A slot that cannot be read or
    /// parsed is logged and also yields an empty cart.
    pub fn open(storage: S) -> Self {
        let items = match storage.load(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartItem>>(&raw) {
                Ok(items) => sanitize(items),
                Err(e) => {
                    warn!(error = %e, "Saved cart is corrupt, starting with an empty cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved cart, starting with an empty cart");
                Vec::new()
            }
        };

        debug!(items = items.len(), "Cart hydrated");

        Self {
            items,
            drawer_open: false,
            storage,
        }
    }

    /// Build a cart from items received elsewhere (e.g. an order request),
    /// normalizing them the same way a hydrated cart is. Nothing is written
    /// until the first mutation.
    pub fn with_items(storage: S, items: Vec<CartItem>) -> Self {
        Self {
            items: sanitize(items),
            drawer_open: false,
            storage,
        }
    }

    /// End the session and hand back the storage backend.
    pub fn close(self) -> S {
        self.storage
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// A quantity of 0 counts as 1. Opens the cart drawer.
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) {
        let quantity = quantity.max(1);
        let mut next = self.items.clone();

        if let Some(item) = next.iter_mut().find(|i| i.id() == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            next.push(CartItem::new(product, quantity));
        }

        self.commit(next);
        self.drawer_open = true;
    }

    /// Remove the line for `id`. Does nothing if it is not in the cart.
    pub fn remove_from_cart(&mut self, id: ProductId) {
        if !self.contains(id) {
            return;
        }
        let next = self.items.iter().filter(|i| i.id() != id).cloned().collect();
        self.commit(next);
    }

    /// Change the quantity of `id` by `delta`, never going below 1.
    ///
    /// Does nothing if `id` is not in the cart.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) {
        if !self.contains(id) {
            return;
        }
        let mut next = self.items.clone();
        for item in next.iter_mut().filter(|i| i.id() == id) {
            item.quantity = apply_delta(item.quantity, delta);
        }
        self.commit(next);
    }

    /// Empty the cart and erase the saved slot.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        if let Err(e) = self.storage.remove(CART_STORAGE_KEY) {
            warn!(error = %e, "Failed to erase saved cart");
        }
    }

    /// Flip the drawer open/closed. Not persisted.
    pub const fn toggle_cart(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Open or close the drawer explicitly. Not persisted.
    pub const fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// Sum of unit price times quantity.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// [`Self::cart_total`] formatted in dong.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_vnd(self.cart_total())
    }

    /// Lines as sent with an order.
    #[must_use]
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items.iter().map(OrderLine::from).collect()
    }

    fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|i| i.id() == id)
    }

    /// Replace the committed items and write them to the slot.
    ///
    /// A failed write keeps the new items in memory; the next successful
    /// mutation writes the full list again.
    fn commit(&mut self, next: Vec<CartItem>) {
        self.items = next;
        match serde_json::to_string(&self.items) {
            Ok(raw) => {
                if let Err(e) = self.storage.save(CART_STORAGE_KEY, &raw) {
                    warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }
}

fn apply_delta(quantity: u32, delta: i64) -> u32 {
    let next = i64::from(quantity).saturating_add(delta).max(1);
    u32::try_from(next).unwrap_or(u32::MAX)
}

/// Restore the invariants on a hydrated list: quantities of at least 1 and
/// one line per product (later duplicates fold into the first).
fn sanitize(raw: Vec<CartItem>) -> Vec<CartItem> {
    let mut items: Vec<CartItem> = Vec::with_capacity(raw.len());
    for mut item in raw {
        item.quantity = item.quantity.max(1);
        if let Some(existing) = items.iter_mut().find(|i| i.id() == item.id()) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }
    items
}
