//! Authentication error types.

use thiserror::Error;

use crate::services::token::TokenError;
use crate::store::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] debandi_core::EmailError),

    /// Invalid credentials (unknown email or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user id claimed by a valid token no longer resolves.
    #[error("user not found")]
    UserNotFound,

    /// The normalized email is already registered.
    #[error("an account with this email already exists")]
    EmailAlreadyExists,

    /// Password shorter than the minimum length.
    #[error("password must be at least 8 characters")]
    PasswordTooShort,

    /// Password missing an uppercase letter, lowercase letter, or digit.
    #[error("password must include upper and lower case letters and a number")]
    PasswordTooWeak,

    /// Password appears on the common-password blocklist.
    #[error("password is too common")]
    CommonPassword,

    /// Token issuance or verification failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
