//! Pricing and shipping policy.
//!
//! Pure, stateless computation over a cart snapshot. Totals are recomputed
//! on every read - the cart is small and mutations are human-paced, so
//! caching would only add invalidation bugs.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::Price;

/// Shipping cost policy: a flat base cost waived above a subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Price,
    /// Flat shipping cost below the threshold.
    pub base_shipping_cost: Price,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Price::from_major(100),
            base_shipping_cost: Price::from_major(10),
        }
    }
}

impl ShippingPolicy {
    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(cart: &Cart) -> Price {
        cart.items()
            .iter()
            .map(|item| item.price * item.quantity)
            .sum()
    }

    /// Shipping cost for the cart.
    ///
    /// An empty cart ships for free: there is nothing to ship, and showing
    /// a charge next to an empty cart reads as a bug to shoppers.
    #[must_use]
    pub fn shipping_cost(&self, cart: &Cart) -> Price {
        if cart.is_empty() || Self::subtotal(cart) >= self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.base_shipping_cost
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn grand_total(&self, cart: &Cart) -> Price {
        Self::subtotal(cart) + self.shipping_cost(cart)
    }

    /// How much more the shopper must add to qualify for free shipping.
    ///
    /// Zero once the threshold is reached. Used for the "add X more for
    /// free shipping" banner only.
    #[must_use]
    pub fn remaining_for_free_shipping(&self, cart: &Cart) -> Price {
        self.free_shipping_threshold
            .saturating_sub(Self::subtotal(cart))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartItemInput;
    use crate::types::ProductId;

    fn cart_with(entries: &[(&str, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, price_cents, quantity) in entries {
            cart.add_item(CartItemInput {
                id: ProductId::new(id),
                name: id.to_owned(),
                price: Price::from_cents(price_cents),
                quantity,
                image_url: None,
                category_name: None,
            });
        }
        cart
    }

    #[test]
    fn test_subtotal_empty_cart() {
        assert_eq!(ShippingPolicy::subtotal(&Cart::new()), Price::ZERO);
    }

    #[test]
    fn test_subtotal_sums_lines() {
        let cart = cart_with(&[("sencha", 4500, 2), ("assam", 1050, 1)]);
        assert_eq!(ShippingPolicy::subtotal(&cart), Price::from_cents(10050));
    }

    #[test]
    fn test_shipping_below_threshold() {
        // subtotal 90 < 100 -> base cost applies, grand total 100
        let policy = ShippingPolicy::default();
        let cart = cart_with(&[("sencha", 4500, 2)]);

        assert_eq!(ShippingPolicy::subtotal(&cart), Price::from_major(90));
        assert_eq!(policy.shipping_cost(&cart), Price::from_major(10));
        assert_eq!(policy.grand_total(&cart), Price::from_major(100));
    }

    #[test]
    fn test_shipping_at_threshold_is_free() {
        // subtotal 120 >= 100 -> free shipping, grand total 120
        let policy = ShippingPolicy::default();
        let cart = cart_with(&[("sencha", 6000, 2)]);

        assert_eq!(ShippingPolicy::subtotal(&cart), Price::from_major(120));
        assert_eq!(policy.shipping_cost(&cart), Price::ZERO);
        assert_eq!(policy.grand_total(&cart), Price::from_major(120));
    }

    #[test]
    fn test_shipping_exactly_at_threshold_is_free() {
        let policy = ShippingPolicy::default();
        let cart = cart_with(&[("sencha", 10000, 1)]);

        assert_eq!(policy.shipping_cost(&cart), Price::ZERO);
        assert_eq!(policy.grand_total(&cart), Price::from_major(100));
    }

    #[test]
    fn test_empty_cart_ships_free() {
        let policy = ShippingPolicy::default();
        let cart = Cart::new();

        assert_eq!(ShippingPolicy::subtotal(&cart), Price::ZERO);
        assert_eq!(policy.shipping_cost(&cart), Price::ZERO);
        assert_eq!(policy.grand_total(&cart), Price::ZERO);
    }

    #[test]
    fn test_remaining_for_free_shipping() {
        let policy = ShippingPolicy::default();

        let cart = cart_with(&[("sencha", 4500, 2)]);
        assert_eq!(
            policy.remaining_for_free_shipping(&cart),
            Price::from_major(10)
        );

        let cart = cart_with(&[("sencha", 6000, 2)]);
        assert_eq!(policy.remaining_for_free_shipping(&cart), Price::ZERO);

        assert_eq!(
            policy.remaining_for_free_shipping(&Cart::new()),
            Price::from_major(100)
        );
    }

    #[test]
    fn test_custom_policy() {
        let policy = ShippingPolicy {
            free_shipping_threshold: Price::from_major(50),
            base_shipping_cost: Price::from_cents(499),
        };
        let cart = cart_with(&[("assam", 1050, 1)]);

        assert_eq!(policy.shipping_cost(&cart), Price::from_cents(499));
        assert_eq!(policy.grand_total(&cart), Price::from_cents(1549));
    }
}
