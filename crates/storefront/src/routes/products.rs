//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::cms::Product;
use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    /// Category slug to filter by.
    pub category: Option<String>,
}

/// List products, optionally filtered by category slug.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.cms().get_products(query.category.as_deref()).await?;
    Ok(Json(products))
}

/// Product detail with its approved reviews and rating aggregate.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Product>> {
    let product = state.cms().get_product_by_slug(&slug).await?;
    Ok(Json(product))
}
