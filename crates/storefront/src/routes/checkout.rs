//! Checkout handler.
//!
//! One POST does the whole thing: validate the form against the session
//! cart, price it, submit to the order intake service, and clear the
//! cart only when the order is accepted. Responses always carry a
//! `success` flag so the client never has to infer the outcome from the
//! status code alone.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::{info, instrument};

use tealeaf_core::CheckoutForm;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{load_cart, save_cart};
use crate::services::orders::{OrderSubmissionFlow, SubmissionState};
use crate::state::AppState;

/// Submit an order.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<Value>)> {
    let mut cart = load_cart(&session).await?;

    let mut flow = OrderSubmissionFlow::new(
        state.orders().clone(),
        state.shipping_policy(),
        state.config().orders.order_number_prefix.clone(),
    );

    let outcome = match flow.submit(&form, &mut cart).await {
        Ok(outcome) => outcome,
        Err(validation) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "success": false, "error": validation.to_string() })),
            ));
        }
    };

    match outcome {
        SubmissionState::Succeeded { order_number } => {
            save_cart(&session, &cart).await?;
            info!(order_number = %order_number, "checkout completed");
            add_breadcrumb(
                "checkout",
                "Order accepted",
                Some(&[("order_number", order_number.as_str())]),
            );
            Ok((
                StatusCode::OK,
                Json(json!({ "success": true, "orderNumber": order_number })),
            ))
        }
        SubmissionState::Failed { message } => Ok((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "success": false, "error": message })),
        )),
        // The flow starts idle and finishes in a terminal state.
        SubmissionState::Idle | SubmissionState::Submitting => Err(AppError::Internal(
            "checkout flow ended in a non-terminal state".to_string(),
        )),
    }
}
