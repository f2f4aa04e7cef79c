//! Cart route handlers.
//!
//! The cart lives in the visitor's session; every mutation loads it,
//! applies the change, saves it back, and returns the freshly priced
//! summary so the client never computes money on its own.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use tealeaf_core::{Cart, CartItem, CartItemInput, Price, ProductId, ShippingPolicy};

use crate::error::Result;
use crate::models::{load_cart, save_cart};
use crate::state::AppState;

/// Cart plus its priced totals, as returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_quantity: u32,
    pub subtotal: Price,
    pub shipping_cost: Price,
    pub total: Price,
    /// Amount still needed to reach free shipping; zero once reached.
    pub remaining_for_free_shipping: Price,
}

impl CartSummary {
    fn build(cart: &Cart, policy: &ShippingPolicy) -> Self {
        Self {
            items: cart.items().to_vec(),
            total_quantity: cart.total_quantity(),
            subtotal: ShippingPolicy::subtotal(cart),
            shipping_cost: policy.shipping_cost(cart),
            total: policy.grand_total(cart),
            remaining_for_free_shipping: policy.remaining_for_free_shipping(cart),
        }
    }
}

/// Quantity update for an item already in the cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityUpdate {
    pub id: ProductId,
    pub quantity: u32,
}

/// Current cart with pricing summary.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartSummary::build(&cart, &state.shipping_policy())))
}

/// Add an item, merging quantity when the product is already present.
#[instrument(skip(state, session, input), fields(product_id = %input.id))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<CartItemInput>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.add_item(input);
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::build(&cart, &state.shipping_policy())))
}

/// Set an item's quantity; zero removes the line.
#[instrument(skip(state, session, update), fields(product_id = %update.id))]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<QuantityUpdate>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&update.id, update.quantity);
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::build(&cart, &state.shipping_policy())))
}

/// Remove an item from the cart.
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.remove_item(&ProductId::new(id));
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::build(&cart, &state.shipping_policy())))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    Ok(Json(CartSummary::build(&cart, &state.shipping_policy())))
}

/// Total item quantity, for the header badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<Value>> {
    let cart = load_cart(&session).await?;
    Ok(Json(json!({ "count": cart.total_quantity() })))
}
