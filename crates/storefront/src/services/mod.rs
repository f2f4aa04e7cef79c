//! Business logic services for storefront.
//!
//! # Services
//!
//! - `orders` - Order submission to the intake service
//! - `uploads` - Validation of admin image uploads
//! - `bot` - Relay of chat messages to the external support bot

pub mod bot;
pub mod orders;
pub mod uploads;
