//! Order submission to the external intake service.
//!
//! Checkout never talks to the intake service directly from a handler.
//! The [`OrderSubmissionFlow`] owns the sequence: validate the form,
//! price the cart, build the payload, submit, and clear the cart only
//! after the intake service accepts the order.

use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use tealeaf_core::{
    Cart, CheckoutError, CheckoutForm, OrderNumber, OrderPayload, OrderReceipt, ShippingPolicy,
};

use crate::config::OrderIntakeConfig;

/// Request timeout for order submission.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Errors
// =============================================================================

/// Failure submitting an order to the intake service.
#[derive(Debug, Error)]
pub enum OrderIntakeError {
    /// Network or protocol failure.
    #[error("order intake request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The intake service did not answer within [`SUBMIT_TIMEOUT`].
    #[error("order intake request timed out")]
    Timeout,

    /// The intake service answered but declined the order.
    #[error("order rejected: {0}")]
    Rejected(String),
}

impl OrderIntakeError {
    /// Message safe to show the shopper. Never exposes transport details.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) | Self::Timeout => {
                "We could not reach the order service. Your cart is unchanged - please try again."
                    .to_string()
            }
            Self::Rejected(reason) => reason.clone(),
        }
    }
}

// =============================================================================
// Intake port
// =============================================================================

/// Port to whatever accepts finished orders.
///
/// Production uses [`HttpOrderIntake`]; tests drive the flow with an
/// in-memory fake.
pub trait OrderIntake {
    /// Submit a priced order payload, returning the accepted receipt.
    fn submit(
        &self,
        payload: &OrderPayload,
    ) -> impl Future<Output = Result<OrderReceipt, OrderIntakeError>> + Send;
}

/// Wire shape returned by the intake service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntakeResponse {
    success: bool,
    #[serde(default)]
    order_number: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the order intake service.
#[derive(Clone)]
pub struct HttpOrderIntake {
    client: reqwest::Client,
    url: String,
}

impl HttpOrderIntake {
    /// Create a new intake client with the submission timeout applied.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    #[must_use]
    pub fn new(config: &OrderIntakeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SUBMIT_TIMEOUT)
            .build()
            .expect("static reqwest client configuration is valid");

        Self {
            client,
            url: config.url.clone(),
        }
    }
}

impl OrderIntake for HttpOrderIntake {
    #[instrument(skip(self, payload), fields(order_number = %payload.order_number))]
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderReceipt, OrderIntakeError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    OrderIntakeError::Timeout
                } else {
                    OrderIntakeError::Http(err)
                }
            })?
            .error_for_status()?;

        let body: IntakeResponse = response.json().await?;

        if !body.success {
            let reason = body
                .error
                .unwrap_or_else(|| "The order was declined.".to_string());
            warn!(reason = %reason, "order intake declined the order");
            return Err(OrderIntakeError::Rejected(reason));
        }

        // Prefer the number the intake service assigned, if any.
        let order_number = body
            .order_number
            .map_or_else(|| payload.order_number.clone(), OrderNumber::new);

        info!(order_number = %order_number, "order accepted");
        Ok(OrderReceipt { order_number })
    }
}

// =============================================================================
// Order numbers
// =============================================================================

/// Generate a fresh order number: `PREFIX-<unix millis>-<4 base36 chars>`.
///
/// Unique enough for a storefront reference; the intake service may still
/// assign its own canonical number.
#[must_use]
pub fn generate_order_number(prefix: &str) -> OrderNumber {
    const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| char::from(ALPHABET[rng.random_range(0..36)]))
        .collect();

    OrderNumber::new(format!("{prefix}-{millis}-{suffix}"))
}

// =============================================================================
// Submission flow
// =============================================================================

/// Where a checkout attempt currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing in flight.
    Idle,
    /// A request to the intake service is in flight.
    Submitting,
    /// The order was accepted.
    Succeeded { order_number: OrderNumber },
    /// The intake service failed or declined; the cart is untouched.
    Failed { message: String },
}

/// Drives a single checkout attempt from form to receipt.
///
/// Repeat submissions while one is in flight are rejected, and the cart
/// is cleared only after the intake service accepts the order.
pub struct OrderSubmissionFlow<I> {
    intake: I,
    policy: ShippingPolicy,
    order_number_prefix: String,
    state: SubmissionState,
}

impl<I: OrderIntake> OrderSubmissionFlow<I> {
    /// Create a new flow in the idle state.
    pub fn new(intake: I, policy: ShippingPolicy, order_number_prefix: impl Into<String>) -> Self {
        Self {
            intake,
            policy,
            order_number_prefix: order_number_prefix.into(),
            state: SubmissionState::Idle,
        }
    }

    /// Current state of the flow.
    #[must_use]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validate and submit a checkout.
    ///
    /// On success the cart is cleared and the state becomes
    /// [`SubmissionState::Succeeded`]. Intake failures leave the cart
    /// intact and record [`SubmissionState::Failed`].
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckoutError`] when the form or cart fails
    /// validation; nothing is sent to the intake service in that case
    /// and the state is unchanged.
    pub async fn submit(
        &mut self,
        form: &CheckoutForm,
        cart: &mut Cart,
    ) -> Result<&SubmissionState, CheckoutError> {
        if self.state == SubmissionState::Submitting {
            // A second submit while one is in flight is a client bug;
            // report the current state rather than double-ordering.
            return Ok(&self.state);
        }

        form.validate(cart)?;

        self.state = SubmissionState::Submitting;

        let order_number = generate_order_number(&self.order_number_prefix);
        let payload = OrderPayload::from_checkout(order_number, form, cart, &self.policy);

        match self.intake.submit(&payload).await {
            Ok(receipt) => {
                cart.clear();
                self.state = SubmissionState::Succeeded {
                    order_number: receipt.order_number,
                };
            }
            Err(err) => {
                self.state = SubmissionState::Failed {
                    message: err.user_message(),
                };
            }
        }

        Ok(&self.state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number("TEA");
        let parts: Vec<&str> = number.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TEA");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_user_messages_hide_transport_details() {
        let msg = OrderIntakeError::Timeout.user_message();
        assert!(msg.contains("cart is unchanged"));

        let msg = OrderIntakeError::Rejected("Card declined".to_string()).user_message();
        assert_eq!(msg, "Card declined");
    }
}
