//! Webhook signature capability.
//!
//! The trust boundary for the webhook endpoint is the private URL plus an
//! optional `x-signature`/`x-signature-256` header that is currently *not*
//! cryptographically verified. The capability is modeled anyway so strict
//! verification can be slotted in later without touching the handler.

/// Result of inspecting a webhook delivery's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStatus {
    /// A verifier that performs real validation would return this.
    Verified,
    /// No verification was performed (the current behavior).
    Unverified,
}

/// Inspects the signature header of a webhook delivery.
pub trait SignatureVerifier: Send + Sync {
    /// Inspect the delivery's signature header, if any.
    fn inspect(&self, signature_header: Option<&str>, payload: &[u8]) -> SignatureStatus;
}
