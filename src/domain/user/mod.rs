//! User profile domain types.

mod profile;

pub use profile::{
    display_name_from_email, AccountDraft, AccountValidationError, NewAccount, UserProfile,
    ADMIN_ROLE, DEFAULT_PLAN_ID, DEFAULT_ROLE, DEFAULT_TIMEZONE, MIN_PASSWORD_LEN,
};
