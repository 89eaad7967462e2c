//! Mercado Pago gateway adapter.
//!
//! Fetches payment resources from the Payments API with a bearer access
//! token. A 404 is a distinct outcome: webhooks can arrive before the
//! payment is queryable, and the confirmation flow acknowledges those
//! and waits for redelivery.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::PaymentId;
use crate::ports::{GatewayError, PaymentGateway, PaymentResource};

const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the Mercado Pago adapter.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    pub access_token: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl MercadoPagoConfig {
    pub fn new(access_token: SecretString) -> Self {
        Self {
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the Mercado Pago Payments API.
pub struct MercadoPagoGateway {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoGateway {
    pub fn new(config: MercadoPagoConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::other(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoGateway {
    async fn fetch_payment(&self, payment_id: &PaymentId) -> Result<PaymentResource, GatewayError> {
        let url = format!(
            "{}/v1/payments/{}",
            self.config.base_url,
            payment_id.as_str()
        );

        let response = self
            .http_client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| GatewayError::other(format!("payment fetch failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }

        if !response.status().is_success() {
            return Err(GatewayError::other(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::other(format!("payment fetch failed: {}", e)))?;
        parse_payment_body(&body)
    }
}

/// A 200 with an empty or null payload means the payment is not queryable
/// yet; the confirmation flow treats that like a 404 and waits for
/// redelivery.
fn parse_payment_body(body: &[u8]) -> Result<PaymentResource, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::NotFound);
    }
    let raw: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| GatewayError::other(format!("malformed payment payload: {}", e)))?;
    if raw.is_null() {
        return Err(GatewayError::NotFound);
    }
    Ok(PaymentResource::from_raw(raw))
}
