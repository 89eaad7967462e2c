//! Payment domain types: webhook normalization and the payment record.

mod record;
mod webhook;

pub use record::PaymentRecord;
pub use webhook::{normalize_webhook, NormalizedEvent, PAYMENT_EVENT_TYPE};
