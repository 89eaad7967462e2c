//! ConfirmPaymentHandler - the payment confirmation state machine.
//!
//! `RECEIVED -> NORMALIZED -> {IGNORED | FETCHED} -> {PENDING | APPLIED | REJECTED}`
//!
//! The outcome variants encode both the terminal state and the response the
//! gateway should see, because the response code is what steers its
//! redelivery behavior: success suppresses retries when redelivery is
//! expected anyway (payment not yet visible, not yet approved), a server
//! error requests a retry for genuine transient failures. The apply step is
//! an idempotent merge-write plus a keyed upsert, so retries and the
//! concurrent-delivery race are both safe.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::foundation::{PaymentId, SubjectId};
use crate::domain::payment::{normalize_webhook, NormalizedEvent, PaymentRecord};
use crate::ports::{
    DocumentStore, GatewayError, PaymentGateway, PaymentResource, SignatureVerifier,
};

/// An inbound webhook delivery: query params, leniently-parsed JSON body,
/// and the optional signature header.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub query: HashMap<String, String>,
    pub body: Value,
    pub signature_header: Option<String>,
}

/// Terminal states of the confirmation flow that are not fatal errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPaymentOutcome {
    /// Non-payment event; acknowledged so the gateway does not retry.
    Ignored { event_type: Option<String> },
    /// Structurally bad input: a payment event without a payment id.
    RejectedMissingPaymentId,
    /// The payment is not visible at the gateway yet; acknowledged,
    /// relying on the gateway's redelivery once it becomes visible.
    PendingNotVisible { payment_id: PaymentId },
    /// The payment exists but is not approved yet; acknowledged.
    PendingNotApproved {
        payment_id: PaymentId,
        status: String,
    },
    /// Approved payment with no usable subject/plan metadata.
    RejectedMissingMetadata { payment_id: PaymentId },
    /// Plan activated and payment record upserted.
    Applied {
        payment_id: PaymentId,
        subject_id: SubjectId,
        plan_id: String,
    },
}

/// Fatal failures; surfaced as server errors so the gateway retries.
#[derive(Debug, Clone, Error)]
pub enum ConfirmPaymentError {
    #[error("error fetching payment: {message}")]
    Gateway { message: String },

    #[error("store write failed: {message}")]
    Store { message: String },
}

/// Handler for inbound payment webhooks.
pub struct ConfirmPaymentHandler {
    gateway: Arc<dyn PaymentGateway>,
    store: Arc<dyn DocumentStore>,
    signature: Arc<dyn SignatureVerifier>,
}

impl ConfirmPaymentHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        store: Arc<dyn DocumentStore>,
        signature: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            gateway,
            store,
            signature,
        }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentOutcome, ConfirmPaymentError> {
        let payload = cmd.body.to_string();
        self.signature
            .inspect(cmd.signature_header.as_deref(), payload.as_bytes());

        // 1. Normalize the two wire shapes.
        let payment_id = match normalize_webhook(&cmd.query, &cmd.body) {
            NormalizedEvent::Payment { payment_id } => payment_id,
            NormalizedEvent::Ignored { event_type } => {
                tracing::debug!(event_type = ?event_type, "non-payment event ignored");
                return Ok(ConfirmPaymentOutcome::Ignored { event_type });
            }
            NormalizedEvent::MissingPaymentId => {
                tracing::warn!(body = %payload, "payment event without payment id");
                return Ok(ConfirmPaymentOutcome::RejectedMissingPaymentId);
            }
        };

        // 2. Resolve the payment from the gateway.
        let resource = match self.gateway.fetch_payment(&payment_id).await {
            Ok(resource) => resource,
            Err(GatewayError::NotFound) => {
                tracing::info!(payment_id = %payment_id, "payment not visible at the gateway yet");
                return Ok(ConfirmPaymentOutcome::PendingNotVisible { payment_id });
            }
            Err(e) => {
                tracing::error!(payment_id = %payment_id, error = %e, "gateway fetch failed");
                return Err(ConfirmPaymentError::Gateway {
                    message: e.to_string(),
                });
            }
        };

        // 3. Only approved payments activate a plan.
        if !resource.is_approved() {
            tracing::info!(payment_id = %payment_id, status = %resource.status, "payment not approved yet");
            return Ok(ConfirmPaymentOutcome::PendingNotApproved {
                payment_id,
                status: resource.status,
            });
        }

        // 4. Subject and plan come from caller-supplied metadata.
        let (subject_id, plan_id) = match (resource.subject_id(), resource.plan_id()) {
            (Some(uid), Some(plan)) => match SubjectId::new(uid) {
                Ok(subject_id) => (subject_id, plan.to_string()),
                Err(_) => {
                    tracing::error!(payment_id = %payment_id, "empty uid in payment metadata");
                    return Ok(ConfirmPaymentOutcome::RejectedMissingMetadata { payment_id });
                }
            },
            _ => {
                tracing::error!(payment_id = %payment_id, "missing uid or plan id in payment metadata");
                return Ok(ConfirmPaymentOutcome::RejectedMissingMetadata { payment_id });
            }
        };

        // 5. Idempotent apply: plan merge-write, then payment record upsert.
        self.apply(&payment_id, &subject_id, &plan_id, &resource)
            .await?;

        tracing::info!(
            payment_id = %payment_id,
            subject_id = %subject_id,
            plan_id = %plan_id,
            "plan activated"
        );
        Ok(ConfirmPaymentOutcome::Applied {
            payment_id,
            subject_id,
            plan_id,
        })
    }

    async fn apply(
        &self,
        payment_id: &PaymentId,
        subject_id: &SubjectId,
        plan_id: &str,
        resource: &PaymentResource,
    ) -> Result<(), ConfirmPaymentError> {
        let now = Utc::now();

        // Plans are currently permanent: expiry is always null on approval.
        let plan_fields = json!({
            "plan_id": plan_id,
            "plan_expires_at": Value::Null,
            "updated_at": now,
        });
        self.store
            .merge_document(&format!("users/{}", subject_id), &plan_fields)
            .await
            .map_err(|e| {
                tracing::error!(subject_id = %subject_id, payment_id = %payment_id, error = %e, "plan write failed");
                ConfirmPaymentError::Store {
                    message: e.to_string(),
                }
            })?;

        let record = PaymentRecord::new(
            subject_id,
            plan_id,
            payment_id,
            &resource.status,
            resource.transaction_amount,
            resource.raw.clone(),
            now,
        );
        let record = serde_json::to_value(record).map_err(|e| ConfirmPaymentError::Store {
            message: e.to_string(),
        })?;
        self.store
            .set_document(&format!("payments/{}", payment_id), &record)
            .await
            .map_err(|e| {
                tracing::error!(subject_id = %subject_id, payment_id = %payment_id, error = %e, "payment record write failed");
                ConfirmPaymentError::Store {
                    message: e.to_string(),
                }
            })
    }
}
