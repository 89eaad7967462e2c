//! Account provisioning handlers: create, delete, and the idempotent
//! first-sign-in profile bootstrap.

mod create_account;
mod delete_account;
mod ensure_profile;

pub use create_account::{CreateAccountError, CreateAccountHandler, CreateAccountResult};
pub use delete_account::{
    DeleteAccountError, DeleteAccountHandler, DELETE_BATCH_SIZE, PROFILE_SUBCOLLECTIONS,
};
pub use ensure_profile::{EnsureProfileCommand, EnsureProfileHandler, EnsureProfileResult};
