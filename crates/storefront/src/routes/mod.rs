//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (database ping)
//! GET  /config                   - Public frontend configuration
//!
//! # Catalog
//! GET  /products                 - Product listing (?category=slug)
//! GET  /products/{slug}          - Product detail with approved reviews
//! GET  /categories               - Category listing
//! GET  /categories/{slug}        - Category detail
//!
//! # Reviews
//! POST /products/{id}/reviews    - Submit a review (rate limited)
//!
//! # Cart (session-backed, JSON)
//! GET    /cart                   - Cart with pricing summary
//! POST   /cart/items             - Add item (or bump quantity)
//! PATCH  /cart/items             - Set quantity (0 removes)
//! DELETE /cart/items/{id}        - Remove item
//! DELETE /cart                   - Clear cart
//! GET    /cart/count             - Total quantity badge
//!
//! # Checkout
//! POST /checkout                 - Validate, price, and submit the order
//!
//! # Admin
//! POST   /admin/products         - Create product
//! PUT    /admin/products/{id}    - Update product
//! DELETE /admin/products/{id}    - Delete product
//! POST   /admin/uploads          - Upload product images (multipart)
//!
//! # Chat
//! GET  /chat/ws?chat_id=...      - Customer WebSocket
//! POST /chat/messages            - Customer message to the bot (rate limited)
//! POST /chat/replies             - Admin reply pushed to the socket
//! ```

pub mod admin;
pub mod cart;
pub mod categories;
pub mod chat;
pub mod checkout;
pub mod products;
pub mod reviews;

use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::middleware::{api_rate_limiter, write_rate_limiter};
use crate::state::AppState;

/// Public runtime configuration for the frontend (analytics ids only).
async fn site_config(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "ga4MeasurementId": state.config().analytics.ga4_measurement_id,
    }))
}

/// Create the product routes router, review submission included.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
        .route(
            "/{id}/reviews",
            post(reviews::create).layer(write_rate_limiter()),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item).patch(cart::update_item))
        .route("/items/{id}", delete(cart::remove_item))
        .route("/count", get(cart::count))
        .layer(api_rate_limiter())
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/uploads", post(admin::upload_images))
}

/// Create the chat routes router.
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(chat::ws))
        .route(
            "/messages",
            post(chat::send_message).layer(write_rate_limiter()),
        )
        .route("/replies", post(chat::send_reply))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(site_config))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/admin", admin_routes())
        .nest("/chat", chat_routes())
}
