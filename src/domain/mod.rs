//! Domain layer - core types and pure logic.

pub mod foundation;
pub mod payment;
pub mod user;
