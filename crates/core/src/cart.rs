//! The in-memory cart store.
//!
//! A [`Cart`] is an ordered list of line items, at most one per product id.
//! The store itself is pure: persistence across page reloads is the job of
//! whoever owns the cart (the storefront keeps it in the session), which is
//! why the whole type is serde-serializable.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Opaque product identifier, unique within the cart.
    pub id: ProductId,
    /// Display name, informational only.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Number of units, always at least 1.
    pub quantity: u32,
    /// Optional product image for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional category name for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

/// Input for [`Cart::add_item`].
///
/// Identical to [`CartItem`] except the quantity may be omitted (defaults
/// to 1). Non-positive quantities are clamped to 1 on add.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

/// The ordered collection of line items a shopper intends to purchase.
///
/// Insertion order is display order. Invariant: at most one [`CartItem`]
/// per product id - adding an existing id increments its quantity instead
/// of duplicating the line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Add an item to the cart.
    ///
    /// If a line with the same id already exists its quantity is
    /// incremented by the input quantity; otherwise a new line is appended.
    /// A quantity of 0 is clamped to 1.
    pub fn add_item(&mut self, input: CartItemInput) {
        let quantity = input.quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|item| item.id == input.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }

        self.items.push(CartItem {
            id: input.id,
            name: input.name,
            price: input.price,
            quantity,
            image_url: input.image_url,
            category_name: input.category_name,
        });
    }

    /// Remove the line with the given id. No-op when absent (idempotent).
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Set the quantity of the line with the given id.
    ///
    /// A quantity of 0 removes the line, matching what shoppers expect
    /// from a stepper that counts down to nothing. No-op when the id is
    /// not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| &item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Read-only view of the line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, item| acc.saturating_add(item.quantity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(id: &str, price_cents: i64, quantity: u32) -> CartItemInput {
        CartItemInput {
            id: ProductId::new(id),
            name: format!("Tea {id}"),
            price: Price::from_cents(price_cents),
            quantity,
            image_url: None,
            category_name: None,
        }
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_same_id_sums_quantities() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 2));
        cart.add_item(input("sencha", 1200, 3));
        cart.add_item(input("sencha", 1200, 1));

        // exactly one line, quantity is the sum of all adds
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 6);
    }

    #[test]
    fn test_add_zero_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 0));

        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 1));
        cart.add_item(input("assam", 900, 1));
        cart.add_item(input("sencha", 1200, 1));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["sencha", "assam"]);
    }

    #[test]
    fn test_remove_item_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 1));
        cart.add_item(input("assam", 900, 1));

        let id = ProductId::new("sencha");
        cart.remove_item(&id);
        let after_first = cart.clone();
        cart.remove_item(&id);

        assert_eq!(cart, after_first);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 1));

        cart.update_quantity(&ProductId::new("sencha"), 5);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 3));

        cart.update_quantity(&ProductId::new("sencha"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 3));

        cart.update_quantity(&ProductId::new("assam"), 7);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 1));
        cart.add_item(input("assam", 900, 1));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 2));
        cart.add_item(input("assam", 900, 3));

        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add_item(input("sencha", 1200, 2));

        let json = serde_json::to_string(&cart).unwrap();
        let parsed: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cart);
    }

    #[test]
    fn test_input_quantity_defaults_to_one() {
        let input: CartItemInput =
            serde_json::from_str(r#"{"id":"sencha","name":"Sencha","price":"12.00"}"#).unwrap();
        assert_eq!(input.quantity, 1);
    }
}
