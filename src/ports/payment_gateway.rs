//! Payment gateway port.
//!
//! The confirmation flow only needs "fetch resource by id over HTTPS" from
//! the gateway. Payments referenced by a webhook may not be visible yet;
//! that case is a distinct error variant because it drives a different
//! response code than a genuine gateway failure.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::foundation::PaymentId;

/// The gateway status that triggers plan activation.
pub const APPROVED_STATUS: &str = "approved";

/// Errors surfaced by gateway fetches.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The payment is not (yet) visible at the gateway. The webhook is
    /// acknowledged and the gateway's own redelivery is relied on.
    #[error("payment not available at the gateway")]
    NotFound,

    /// Any other gateway failure. Surfaced as a server error so the
    /// gateway retries.
    #[error("gateway error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// A payment resource as returned by the gateway.
///
/// `raw` is the complete payload; the typed accessors implement the
/// metadata fallbacks the confirmation flow depends on.
#[derive(Debug, Clone)]
pub struct PaymentResource {
    pub status: String,
    pub transaction_amount: Option<f64>,
    pub raw: Value,
}

impl PaymentResource {
    /// Builds a resource from the raw gateway payload.
    pub fn from_raw(raw: Value) -> Self {
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let transaction_amount = raw.get("transaction_amount").and_then(Value::as_f64);
        Self {
            status,
            transaction_amount,
            raw,
        }
    }

    /// True when the gateway reports the payment as approved.
    pub fn is_approved(&self) -> bool {
        self.status == APPROVED_STATUS
    }

    /// Caller-supplied metadata: `metadata` when present and non-empty,
    /// otherwise the `additional_info.metadata` fallback location.
    pub fn metadata(&self) -> Option<&Value> {
        let primary = self.raw.get("metadata").filter(|m| {
            m.as_object().is_some_and(|o| !o.is_empty())
        });
        primary.or_else(|| {
            self.raw
                .get("additional_info")
                .and_then(|info| info.get("metadata"))
        })
    }

    /// The owning subject id from metadata (`uid`).
    pub fn subject_id(&self) -> Option<&str> {
        self.metadata()?.get("uid")?.as_str()
    }

    /// The plan id from metadata, accepting both `planId` and `plan_id`.
    pub fn plan_id(&self) -> Option<&str> {
        let metadata = self.metadata()?;
        metadata
            .get("planId")
            .or_else(|| metadata.get("plan_id"))?
            .as_str()
    }
}

/// External payment gateway client.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Fetch the payment resource for the given id.
    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentResource, GatewayError>;
}
