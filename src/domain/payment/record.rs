//! The append-only `payments/{paymentId}` record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{PaymentId, SubjectId};

/// Snapshot of a confirmed payment, keyed by the gateway payment id.
///
/// One record per distinct payment id: redelivery of the same payment
/// overwrites the same key instead of creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub uid: String,
    #[serde(rename = "planId")]
    pub plan_id: String,
    #[serde(rename = "mpPaymentId")]
    pub payment_id: String,
    pub status: String,
    pub amount: Option<f64>,
    /// Full gateway payload, kept for manual reconciliation.
    pub raw: Value,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(
        subject_id: &SubjectId,
        plan_id: impl Into<String>,
        payment_id: &PaymentId,
        status: impl Into<String>,
        amount: Option<f64>,
        raw: Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: subject_id.as_str().to_string(),
            plan_id: plan_id.into(),
            payment_id: payment_id.as_str().to_string(),
            status: status.into(),
            amount,
            raw,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = PaymentRecord::new(
            &SubjectId::new("uid-1").unwrap(),
            "premium",
            &PaymentId::new("42").unwrap(),
            "approved",
            Some(1500.0),
            json!({"status": "approved"}),
            Utc::now(),
        );

        let doc = serde_json::to_value(record).unwrap();
        assert_eq!(doc["uid"], "uid-1");
        assert_eq!(doc["planId"], "premium");
        assert_eq!(doc["mpPaymentId"], "42");
        assert_eq!(doc["status"], "approved");
        assert_eq!(doc["amount"], 1500.0);
        assert!(doc.get("raw").is_some());
        assert!(doc.get("created_at").is_some());
    }
}
