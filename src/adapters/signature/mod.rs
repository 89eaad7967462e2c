//! Webhook signature adapters.
//!
//! The only adapter today is the pass-through one: deliveries are never
//! rejected for a missing or bad signature, the header is only observed
//! for the logs.

use crate::ports::{SignatureStatus, SignatureVerifier};

/// Signature "verifier" that records header presence and always reports
/// `Unverified`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnverifiedSignatureVerifier;

impl UnverifiedSignatureVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for UnverifiedSignatureVerifier {
    fn inspect(&self, signature_header: Option<&str>, payload: &[u8]) -> SignatureStatus {
        tracing::debug!(
            signature_present = signature_header.is_some(),
            payload_bytes = payload.len(),
            "webhook signature not verified"
        );
        SignatureStatus::Unverified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_reports_unverified() {
        let verifier = UnverifiedSignatureVerifier::new();
        assert_eq!(
            verifier.inspect(Some("ts=1,v1=abc"), b"{}"),
            SignatureStatus::Unverified
        );
        assert_eq!(verifier.inspect(None, b""), SignatureStatus::Unverified);
    }
}
