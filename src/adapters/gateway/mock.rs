//! In-memory payment gateway for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::PaymentId;
use crate::ports::{GatewayError, PaymentGateway, PaymentResource};

/// Test double for `PaymentGateway`. Payments are registered by id;
/// unknown ids answer `NotFound` like the real API does for payments
/// that are not visible yet.
#[derive(Default)]
pub struct MockPaymentGateway {
    payments: Mutex<HashMap<String, Value>>,
    fail_next_fetch: Mutex<Option<String>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the raw payload served for `payment_id`.
    pub fn register_payment(&self, payment_id: impl Into<String>, raw: Value) {
        self.payments.lock().unwrap().insert(payment_id.into(), raw);
    }

    /// Make the next fetch fail with `message`.
    pub fn fail_next_fetch(&self, message: impl Into<String>) {
        *self.fail_next_fetch.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentResource, GatewayError> {
        if let Some(message) = self.fail_next_fetch.lock().unwrap().take() {
            return Err(GatewayError::other(message));
        }

        let payments = self.payments.lock().unwrap();
        match payments.get(payment_id.as_str()) {
            Some(raw) => Ok(PaymentResource::from_raw(raw.clone())),
            None => Err(GatewayError::NotFound),
        }
    }
}
