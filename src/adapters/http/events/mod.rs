//! Event HTTP surface: identity lifecycle hooks.

pub mod handlers;
pub mod routes;

pub use handlers::EventsAppState;
pub use routes::event_routes;
