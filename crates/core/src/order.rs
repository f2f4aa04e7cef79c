//! Order snapshot types.
//!
//! An [`OrderPayload`] is the all-or-nothing snapshot of cart, contact,
//! delivery, and payment data sent to the order-intake service. The card
//! number is masked to its last 4 digits here, before the payload can be
//! transmitted or logged anywhere.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::{CheckoutForm, Delivery, Payment};
use crate::pricing::ShippingPolicy;
use crate::types::{Price, ProductId};

/// A human-facing order number, e.g. `TEA-1724500000000-X4J9`.
///
/// Format: `PREFIX-<unix millis>-<4 random base36 chars, uppercase>`.
/// Generation lives in the storefront crate (it needs a clock and an RNG);
/// this type just carries the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wrap an already-formatted order number.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One cart line frozen into the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

/// Payment details as they may be persisted or displayed: the method tag
/// plus at most the last 4 digits of the card number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
}

impl From<&Payment> for PaymentSummary {
    fn from(payment: &Payment) -> Self {
        match payment {
            Payment::CardOnline { card_number, .. } => Self {
                method: "card_online".to_owned(),
                card_last4: Some(mask_card_number(card_number)),
            },
            Payment::CardOnDelivery => Self {
                method: "card_on_delivery".to_owned(),
                card_last4: None,
            },
            Payment::Cash => Self {
                method: "cash".to_owned(),
                card_last4: None,
            },
        }
    }
}

/// The last 4 digits of a card number, spaces ignored.
#[must_use]
pub fn mask_card_number(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    digits[digits.len().saturating_sub(4)..].iter().collect()
}

/// The order snapshot submitted to the order-intake service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_number: OrderNumber,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<OrderLine>,
    pub delivery: Delivery,
    pub payment: PaymentSummary,
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
}

impl OrderPayload {
    /// Freeze the current cart and form into an order snapshot.
    ///
    /// Assumes the form has already passed [`CheckoutForm::validate`];
    /// totals are computed from the cart at this instant so later cart
    /// edits cannot change an in-flight order.
    #[must_use]
    pub fn from_checkout(
        order_number: OrderNumber,
        form: &CheckoutForm,
        cart: &Cart,
        policy: &ShippingPolicy,
    ) -> Self {
        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                id: item.id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
            })
            .collect();

        Self {
            order_number,
            name: form.full_name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            notes: form.notes.clone().filter(|n| !n.trim().is_empty()),
            items,
            delivery: form.delivery.clone(),
            payment: PaymentSummary::from(&form.payment),
            subtotal: ShippingPolicy::subtotal(cart),
            shipping_cost: policy.shipping_cost(cart),
            total: policy.grand_total(cart),
        }
    }
}

/// What a successful order intake returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_number: OrderNumber,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartItemInput;
    use crate::checkout::DeliveryMethod;

    fn form() -> CheckoutForm {
        CheckoutForm {
            full_name: "  Alex Morgan  ".to_owned(),
            email: "user@example.com".to_owned(),
            phone: "+1 555 123 4567".to_owned(),
            notes: Some("ring the bell".to_owned()),
            delivery: Delivery {
                city: "Kyiv".to_owned(),
                method: DeliveryMethod::PostOffice {
                    branch: "17".to_owned(),
                },
            },
            payment: Payment::CardOnline {
                card_number: "1111 2222 3333 4444".to_owned(),
                card_expiry: "12/27".to_owned(),
                card_cvc: "123".to_owned(),
            },
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(CartItemInput {
            id: ProductId::new("sencha"),
            name: "Sencha".to_owned(),
            price: Price::from_major(45),
            quantity: 2,
            image_url: None,
            category_name: None,
        });
        cart
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("1111 2222 3333 4444"), "4444");
        assert_eq!(mask_card_number("1111222233334444"), "4444");
        assert_eq!(mask_card_number("12"), "12");
        assert_eq!(mask_card_number(""), "");
    }

    #[test]
    fn test_payload_masks_card_and_trims_contact() {
        let policy = ShippingPolicy::default();
        let payload =
            OrderPayload::from_checkout(OrderNumber::new("TEA-1-AAAA"), &form(), &cart(), &policy);

        assert_eq!(payload.name, "Alex Morgan");
        assert_eq!(payload.payment.method, "card_online");
        assert_eq!(payload.payment.card_last4.as_deref(), Some("4444"));

        // the full card number must not appear anywhere in the payload
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("3333"));
        assert!(json.contains("4444"));
    }

    #[test]
    fn test_payload_totals_snapshot() {
        let policy = ShippingPolicy::default();
        let payload =
            OrderPayload::from_checkout(OrderNumber::new("TEA-1-AAAA"), &form(), &cart(), &policy);

        assert_eq!(payload.subtotal, Price::from_major(90));
        assert_eq!(payload.shipping_cost, Price::from_major(10));
        assert_eq!(payload.total, Price::from_major(100));
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].quantity, 2);
    }

    #[test]
    fn test_payload_wire_shape() {
        let policy = ShippingPolicy::default();
        let payload =
            OrderPayload::from_checkout(OrderNumber::new("TEA-1-AAAA"), &form(), &cart(), &policy);

        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["orderNumber"], "TEA-1-AAAA");
        assert_eq!(json["delivery"]["method"], "post_office");
        assert_eq!(json["delivery"]["branch"], "17");
        assert_eq!(json["payment"]["method"], "card_online");
        assert_eq!(json["payment"]["cardLast4"], "4444");
        assert!(json["payment"].get("cardNumber").is_none());
    }
}
