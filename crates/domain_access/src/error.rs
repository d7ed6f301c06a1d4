//! Access domain errors

use thiserror::Error;

/// Errors raised by user account operations
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}
