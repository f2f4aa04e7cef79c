//! Storefront-side models and session data access.

pub mod session;

pub use session::{load_cart, save_cart};
