//! Identity provider adapters.

mod firebase;
mod mock;

pub use firebase::{FirebaseIdentityConfig, FirebaseIdentityProvider};
pub use mock::MockIdentityProvider;
