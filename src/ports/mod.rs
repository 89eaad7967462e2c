//! Ports - interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! application and the outside world; adapters implement them.
//!
//! - `IdentityProvider` - credential verification and identity lifecycle
//! - `DocumentStore` - key/value + hierarchical-collection document store
//! - `PaymentGateway` - fetch a payment resource by id over HTTPS
//! - `SignatureVerifier` - webhook signature capability (currently a stub)

mod document_store;
mod identity_provider;
mod payment_gateway;
mod signature_verifier;

pub use document_store::{DocumentStore, StoreError};
pub use identity_provider::{IdentityError, IdentityProvider, NewIdentity};
pub use payment_gateway::{GatewayError, PaymentGateway, PaymentResource, APPROVED_STATUS};
pub use signature_verifier::{SignatureStatus, SignatureVerifier};
