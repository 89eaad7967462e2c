//! Adapters - implementations of the port interfaces.
//!
//! - `http` - axum routes, handlers, and DTOs
//! - `store` - Firestore REST document store + in-memory test double
//! - `identity` - Firebase identity provider + in-memory test double
//! - `gateway` - Mercado Pago payment gateway + configurable test double
//! - `signature` - the (deliberately) unverified webhook signature stub

pub mod gateway;
pub mod http;
pub mod identity;
pub mod signature;
pub mod store;
