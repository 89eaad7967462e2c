//! Application layer - command handlers orchestrating the ports.

pub mod guard;
pub mod payment;
pub mod provisioning;

pub use guard::{AdminGuard, GuardError};
