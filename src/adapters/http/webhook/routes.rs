//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_payment_webhook, WebhookAppState};

/// Create the webhook router.
///
/// No authentication: the gateway calls these directly. The URL is the
/// only shared secret today.
///
/// # Routes
/// - `POST /payments` - payment gateway deliveries
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/payments", post(handle_payment_webhook))
}
