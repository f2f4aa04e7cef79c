//! Review submission handler.
//!
//! Reviews go straight to the CMS moderation queue; nothing a customer
//! submits here is visible until approved.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use tealeaf_core::{Email, ProductId};

use crate::cms::NewReview;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Incoming review submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub author_name: String,
    pub author_email: String,
}

/// Submit a review for a product.
#[instrument(skip(state, submission), fields(product_id = %product_id))]
pub async fn create(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(submission): Json<ReviewSubmission>,
) -> Result<(StatusCode, Json<Value>)> {
    if !(1..=5).contains(&submission.rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let author_name = submission.author_name.trim();
    if author_name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let email = Email::parse(&submission.author_email)
        .map_err(|_| AppError::BadRequest("A valid email address is required".to_string()))?;

    let comment = submission
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let review = NewReview {
        product_id: ProductId::new(product_id),
        rating: submission.rating,
        comment,
        author_name: author_name.to_string(),
        author_email: email.into_inner(),
    };

    let id = state.cms().create_review(&review).await?;
    add_breadcrumb("reviews", "Review submitted", Some(&[("review_id", &id)]));

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
