//! Admin HTTP surface: account provisioning and deprovisioning.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AdminAppState;
pub use routes::admin_routes;
