//! Checkout form model and validation.
//!
//! The delivery and payment methods are tagged unions so that invalid
//! field combinations (a courier order with a post-office branch, a cash
//! order with card fields) are unrepresentable rather than checked at
//! runtime.
//!
//! Validation runs as an ordered chain: [`CheckoutForm::violations`]
//! collects every failure in a fixed order, and [`CheckoutForm::validate`]
//! surfaces the first one, which is what the checkout UI shows. Switching
//! to showing all errors at once is a one-line change at the call site.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{Email, Phone};

/// Maximum length of the free-form order notes field.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Expected number of digits in a card number.
const CARD_NUMBER_DIGITS: usize = 16;

/// Expected number of digits in a card verification code.
const CARD_CVC_DIGITS: usize = 3;

/// How the order reaches the shopper.
///
/// Serialized with a `method` tag (`courier` / `post_office`) to match the
/// order-intake wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Door-to-door courier delivery.
    Courier {
        street: String,
        house: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        apartment: Option<String>,
    },
    /// Pickup at a postal branch.
    PostOffice { branch: String },
}

/// Delivery details: the city plus the method-specific address fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub city: String,
    #[serde(flatten)]
    pub method: DeliveryMethod,
}

/// How the shopper pays.
///
/// Only online card payment is wired end-to-end today; the other two
/// methods exist in the model so the order-intake contract stays stable
/// when they are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Payment {
    /// Card charged at checkout. Card fields are validated here and the
    /// number is masked to its last 4 digits before leaving the process.
    #[serde(rename_all = "camelCase")]
    CardOnline {
        card_number: String,
        card_expiry: String,
        card_cvc: String,
    },
    /// Card charged by the courier on delivery.
    CardOnDelivery,
    /// Cash on delivery.
    Cash,
}

/// The ephemeral contact/delivery/payment data collected before order
/// submission. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub delivery: Delivery,
    pub payment: Payment,
}

/// A single checkout validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no items, regardless of form content.
    #[error("your cart is empty")]
    EmptyCart,

    /// The full name is blank after trimming.
    #[error("please enter your full name")]
    MissingName,

    /// The email does not look like `local@domain.tld`.
    #[error("please enter a valid email address")]
    InvalidEmail,

    /// The phone number does not look dialable.
    #[error("please enter a valid phone number")]
    InvalidPhone,

    /// A required address field for the chosen delivery method is blank.
    #[error("please fill in all delivery address fields")]
    IncompleteAddress,

    /// The card number is not 16 digits after stripping spaces.
    #[error("card number must be 16 digits")]
    InvalidCardNumber,

    /// The expiry is not `MM/YY` with month 01-12.
    #[error("card expiry must be in MM/YY format")]
    InvalidExpiry,

    /// The verification code is not exactly 3 digits.
    #[error("card security code must be 3 digits")]
    InvalidCvc,

    /// The notes field exceeds the maximum length.
    #[error("order notes must be at most {MAX_NOTES_LENGTH} characters")]
    NotesTooLong,
}

impl CheckoutForm {
    /// Check the form against the cart, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] in the fixed evaluation order:
    /// cart, name, email, phone, address, card fields, notes.
    pub fn validate(&self, cart: &Cart) -> Result<(), CheckoutError> {
        match self.violations(cart).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Collect every validation failure in evaluation order.
    ///
    /// All checks are pure, so evaluating the full chain costs nothing;
    /// callers that want first-failure-wins take the head of the list.
    #[must_use]
    pub fn violations(&self, cart: &Cart) -> Vec<CheckoutError> {
        let mut errors = Vec::new();

        if cart.is_empty() {
            errors.push(CheckoutError::EmptyCart);
        }

        if self.full_name.trim().is_empty() {
            errors.push(CheckoutError::MissingName);
        }

        if Email::parse(self.email.trim()).is_err() {
            errors.push(CheckoutError::InvalidEmail);
        }

        if Phone::parse(self.phone.trim()).is_err() {
            errors.push(CheckoutError::InvalidPhone);
        }

        if !self.delivery_complete() {
            errors.push(CheckoutError::IncompleteAddress);
        }

        if let Payment::CardOnline {
            card_number,
            card_expiry,
            card_cvc,
        } = &self.payment
        {
            if !is_valid_card_number(card_number) {
                errors.push(CheckoutError::InvalidCardNumber);
            }
            if !is_valid_expiry(card_expiry) {
                errors.push(CheckoutError::InvalidExpiry);
            }
            if !is_valid_cvc(card_cvc) {
                errors.push(CheckoutError::InvalidCvc);
            }
        }

        if let Some(notes) = &self.notes
            && notes.chars().count() > MAX_NOTES_LENGTH
        {
            errors.push(CheckoutError::NotesTooLong);
        }

        errors
    }

    fn delivery_complete(&self) -> bool {
        if self.delivery.city.trim().is_empty() {
            return false;
        }

        match &self.delivery.method {
            DeliveryMethod::Courier { street, house, .. } => {
                !street.trim().is_empty() && !house.trim().is_empty()
            }
            DeliveryMethod::PostOffice { branch } => !branch.trim().is_empty(),
        }
    }
}

/// Exactly 16 digits once spaces are stripped.
fn is_valid_card_number(number: &str) -> bool {
    let stripped: String = number.chars().filter(|c| *c != ' ').collect();
    stripped.len() == CARD_NUMBER_DIGITS && stripped.chars().all(|c| c.is_ascii_digit())
}

/// `MM/YY` with month 01-12.
fn is_valid_expiry(expiry: &str) -> bool {
    let bytes = expiry.as_bytes();
    if bytes.len() != 5 || bytes[2] != b'/' {
        return false;
    }

    let (month, year) = (&expiry[..2], &expiry[3..]);
    // both halves must be digits; integer parsing alone would let "+1" through
    if !month.chars().all(|c| c.is_ascii_digit()) || !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    matches!(month.parse::<u8>(), Ok(m) if (1..=12).contains(&m))
}

/// Exactly 3 digits, no stripping.
fn is_valid_cvc(cvc: &str) -> bool {
    cvc.len() == CARD_CVC_DIGITS && cvc.chars().all(|c| c.is_ascii_digit())
}
