//! HTTP handler for payment gateway webhook deliveries.
//!
//! Status codes steer the gateway's redelivery machinery: 200 means
//! "handled or waiting on redelivery", 400 means "structurally bad,
//! never redeliver", 500 means "transient, retry".

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::application::payment::{
    ConfirmPaymentCommand, ConfirmPaymentError, ConfirmPaymentHandler, ConfirmPaymentOutcome,
};
use crate::ports::{DocumentStore, PaymentGateway, SignatureVerifier};

/// Shared dependencies for the webhook surface.
#[derive(Clone)]
pub struct WebhookAppState {
    pub gateway: Arc<dyn PaymentGateway>,
    pub store: Arc<dyn DocumentStore>,
    pub signature: Arc<dyn SignatureVerifier>,
}

impl WebhookAppState {
    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(
            self.gateway.clone(),
            self.store.clone(),
            self.signature.clone(),
        )
    }
}

/// Server-error envelope: `{"error": ..., "message": ...}`.
#[derive(Debug, Serialize)]
struct WebhookErrorResponse {
    error: &'static str,
    message: String,
}

fn signature_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-signature")
        .or_else(|| headers.get("x-signature-256"))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// POST /webhooks/payments - process a gateway delivery.
///
/// Both wire shapes are accepted: the JSON-body shape and the legacy
/// query-parameter shape with an optional body. Malformed or absent
/// JSON degrades to null rather than rejecting the delivery outright.
pub async fn handle_payment_webhook(
    State(state): State<WebhookAppState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };

    let cmd = ConfirmPaymentCommand {
        query,
        body,
        signature_header: signature_header(&headers),
    };

    let outcome = match state.confirm_payment_handler().handle(cmd).await {
        Ok(outcome) => outcome,
        Err(ConfirmPaymentError::Gateway { message }) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookErrorResponse {
                    error: "error fetching payment",
                    message,
                }),
            )
                .into_response();
        }
        Err(ConfirmPaymentError::Store { message }) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookErrorResponse {
                    error: "firestore error",
                    message,
                }),
            )
                .into_response();
        }
    };

    match outcome {
        ConfirmPaymentOutcome::Ignored { .. } => (StatusCode::OK, "ignored").into_response(),
        ConfirmPaymentOutcome::RejectedMissingPaymentId => {
            (StatusCode::BAD_REQUEST, "missing payment id").into_response()
        }
        ConfirmPaymentOutcome::PendingNotVisible { .. } => {
            (StatusCode::OK, "payment not found yet").into_response()
        }
        ConfirmPaymentOutcome::PendingNotApproved { .. } => {
            (StatusCode::OK, "payment not approved").into_response()
        }
        ConfirmPaymentOutcome::RejectedMissingMetadata { .. } => {
            (StatusCode::BAD_REQUEST, "missing metadata").into_response()
        }
        ConfirmPaymentOutcome::Applied { .. } => (StatusCode::OK, "ok").into_response(),
    }
}
