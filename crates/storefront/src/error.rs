//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that translates domain errors to HTTP
//! status + JSON message at the boundary and captures unexpected errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::products::ProductError;
use crate::services::token::TokenError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog operation failed.
    #[error("product error: {0}")]
    Product(#[from] ProductError),

    /// Request body or parameters failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable session token on a protected route.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the administrator claim.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempt budget exhausted for this client.
    #[error("rate limited")]
    RateLimited {
        /// When the current window resets.
        reset_at: Option<DateTime<Utc>>,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is unexpected and worth a Sentry event.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_)
                    | AuthError::PasswordHash
                    | AuthError::Token(TokenError::Signing(_))
            ),
            Self::Product(err) => matches!(err, ProductError::Repository(_)),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::Token(TokenError::Invalid) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                // Conflict surfaced as 400, matching the public API contract
                AuthError::EmailAlreadyExists
                | AuthError::InvalidEmail(_)
                | AuthError::PasswordTooShort
                | AuthError::PasswordTooWeak
                | AuthError::CommonPassword => StatusCode::BAD_REQUEST,
                AuthError::Token(TokenError::Signing(_))
                | AuthError::Repository(_)
                | AuthError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Product(err) => match err {
                ProductError::NotFound => StatusCode::NOT_FOUND,
                ProductError::InvalidPrice
                | ProductError::InvalidSearchQuery
                | ProductError::SlugTaken => StatusCode::BAD_REQUEST,
                ProductError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    fn message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::Token(TokenError::Invalid) => "Invalid token".to_owned(),
                AuthError::UserNotFound => "User not found".to_owned(),
                AuthError::EmailAlreadyExists
                | AuthError::InvalidEmail(_)
                | AuthError::PasswordTooShort
                | AuthError::PasswordTooWeak
                | AuthError::CommonPassword => err.to_string(),
                AuthError::Token(TokenError::Signing(_))
                | AuthError::Repository(_)
                | AuthError::PasswordHash => "Internal server error".to_owned(),
            },
            Self::Product(err) => match err {
                ProductError::Repository(_) => "Internal server error".to_owned(),
                other => other.to_string(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::RateLimited { .. } => "Too many attempts, please try again later".to_owned(),
            Self::Validation(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let mut body = json!({ "error": self.message() });
        if let Self::RateLimited {
            reset_at: Some(reset_at),
        } = &self
        {
            body["resetTime"] = json!(reset_at.timestamp_millis());
        }

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
