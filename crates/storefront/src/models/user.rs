//! User domain types.
//!
//! The password hash is not part of [`User`]: it stays inside the repository
//! layer and is only surfaced through the dedicated credential lookup used by
//! login. Serializing a `User` is therefore always safe.

use chrono::{DateTime, Utc};
use serde::Serialize;

use debandi_core::{Email, UserId};

/// A storefront user (domain type).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalized email address (natural lookup key).
    pub email: Email,
    /// Display first name (may be empty).
    pub first_name: String,
    /// Display last name (may be empty).
    pub last_name: String,
    /// Whether this user may perform administrative operations.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2 PHC-format hash, produced by the auth service.
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
}

/// Partial update for an existing user.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: Option<String>,
}
