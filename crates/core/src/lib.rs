//! Tealeaf Core - Shared domain library.
//!
//! This crate holds the parts of the storefront that are pure logic:
//! the cart store, the pricing and shipping policy, checkout form
//! validation, and the order snapshot types. It is used by:
//! - `storefront` - Public-facing web service
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no database
//! access, no HTTP clients. Everything here is synchronous and
//! deterministic, which keeps it trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and phone numbers
//! - [`cart`] - The in-memory cart store
//! - [`pricing`] - Subtotal, shipping cost, and grand total computation
//! - [`checkout`] - Checkout form model and validation
//! - [`order`] - Order snapshot sent to the order-intake service

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartItem, CartItemInput};
pub use checkout::{CheckoutError, CheckoutForm, Delivery, DeliveryMethod, Payment};
pub use order::{OrderLine, OrderNumber, OrderPayload, OrderReceipt, PaymentSummary};
pub use pricing::ShippingPolicy;
pub use types::*;
