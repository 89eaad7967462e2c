//! Webhook normalization - a pure function over the two gateway wire shapes.
//!
//! The gateway delivers notifications in two formats:
//!
//! - new shape, body only: `{type, action, data: {id}}`
//! - old shape: query params `topic`/`type` and `data.id`/`id`, or a body
//!   carrying `{topic, resource}` where `resource` is a string or `{id}`
//!
//! Normalization produces a tagged union instead of ad-hoc field probing in
//! the handler. The event is transient - a parse result, never persisted.

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::foundation::PaymentId;

/// The only event type the confirmation flow acts on.
pub const PAYMENT_EVENT_TYPE: &str = "payment";

/// Outcome of normalizing an inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedEvent {
    /// A payment event carrying the gateway payment id.
    Payment { payment_id: PaymentId },
    /// Not a payment event; acknowledged without side effects.
    Ignored { event_type: Option<String> },
    /// A payment event with no resolvable payment id. Terminal: the input
    /// is structurally bad, redelivery cannot fix it.
    MissingPaymentId,
}

/// Normalizes a webhook delivery from its query params and (leniently
/// parsed) JSON body.
pub fn normalize_webhook(query: &HashMap<String, String>, body: &Value) -> NormalizedEvent {
    let (event_type, payment_id) = if let Some(body_type) = body.get("type").and_then(Value::as_str)
    {
        // New shape: the body is authoritative.
        (
            Some(body_type.to_string()),
            body.get("data")
                .and_then(|d| d.get("id"))
                .and_then(PaymentId::from_json),
        )
    } else {
        let event_type = query
            .get("topic")
            .or_else(|| query.get("type"))
            .cloned()
            .or_else(|| {
                body.get("topic")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
        (event_type, old_shape_payment_id(query, body))
    };

    match event_type.as_deref() {
        Some(PAYMENT_EVENT_TYPE) => match payment_id {
            Some(payment_id) => NormalizedEvent::Payment { payment_id },
            None => NormalizedEvent::MissingPaymentId,
        },
        _ => NormalizedEvent::Ignored { event_type },
    }
}

/// Old-shape payment id resolution, in documented precedence order.
fn old_shape_payment_id(query: &HashMap<String, String>, body: &Value) -> Option<PaymentId> {
    if let Some(id) = query.get("data.id").or_else(|| query.get("id")) {
        return PaymentId::new(id.clone()).ok();
    }
    if let Some(id) = body.get("data").and_then(|d| d.get("id")) {
        return PaymentId::from_json(id);
    }
    match body.get("resource") {
        Some(Value::String(resource)) => PaymentId::new(resource.clone()).ok(),
        Some(Value::Object(resource)) => resource.get("id").and_then(PaymentId::from_json),
        _ => None,
    }
}
