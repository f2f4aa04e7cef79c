//! Session-backed cart storage.
//!
//! The cart is plain session data: a [`Cart`] serialized under a fixed key
//! in the tower-sessions record. Sessions persist in `PostgreSQL`, so the
//! cart survives server restarts and follows the visitor's cookie for up
//! to the session expiry.

use tower_sessions::Session;

use tealeaf_core::Cart;

use crate::error::Result;

/// Session data keys.
pub mod keys {
    /// Serialized [`tealeaf_core::Cart`].
    pub const CART: &str = "cart";
}

/// Load the visitor's cart from the session, defaulting to empty.
///
/// # Errors
///
/// Returns an error if the session store is unavailable.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Persist the visitor's cart to the session.
///
/// An empty cart is removed from the session entirely so that abandoned
/// visitors do not pin session records with empty payloads.
///
/// # Errors
///
/// Returns an error if the session store is unavailable.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    if cart.is_empty() {
        session.remove::<Cart>(keys::CART).await?;
    } else {
        session.insert(keys::CART, cart).await?;
    }
    Ok(())
}
