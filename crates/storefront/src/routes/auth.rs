//! Authentication route handlers.
//!
//! The sensitive endpoints consult their rate limiter before touching
//! credentials: over-budget clients are rejected up front, failures record an
//! attempt, and success forgives the fingerprint's prior failures.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use debandi_core::UserId;

use crate::error::{AppError, Result, set_sentry_user};
use crate::middleware::{ClientFingerprint, RequireAuth, build_auth_cookie, clear_auth_cookie};
use crate::services::auth::AuthSession;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle login.
///
/// Returns 401 on invalid credentials and 429 (with `resetTime`) once the
/// fingerprint's attempt budget is spent.
pub async fn login(
    State(state): State<AppState>,
    ClientFingerprint(fingerprint): ClientFingerprint,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = payload.map_err(bad_json)?;

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_owned(),
        ));
    }

    let limiter = state.login_limiter();
    if limiter.is_limited(&fingerprint) {
        let status = limiter.status(&fingerprint);
        tracing::warn!(%fingerprint, "login rate limited");
        return Err(AppError::RateLimited {
            reset_at: status.reset_at,
        });
    }

    match state.auth().login(&body.email, &body.password) {
        Ok(session) => {
            limiter.reset(&fingerprint);
            set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
            Ok(session_response(
                StatusCode::OK,
                "Login successful",
                &session,
                state.config().cookie_secure(),
            ))
        }
        Err(err) => {
            limiter.record_attempt(&fingerprint);
            tracing::warn!(%fingerprint, "login failed");
            Err(err.into())
        }
    }
}

/// Handle registration.
///
/// New accounts never carry the administrator flag. Returns 201 with a fresh
/// session on success; 400 on validation failures; 429 once the (stricter)
/// registration budget is spent.
pub async fn register(
    State(state): State<AppState>,
    ClientFingerprint(fingerprint): ClientFingerprint,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = payload.map_err(bad_json)?;

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_owned(),
        ));
    }

    let limiter = state.register_limiter();
    if limiter.is_limited(&fingerprint) {
        let status = limiter.status(&fingerprint);
        tracing::warn!(%fingerprint, "registration rate limited");
        return Err(AppError::RateLimited {
            reset_at: status.reset_at,
        });
    }

    match state.auth().register(
        &body.email,
        &body.password,
        body.first_name.as_deref(),
        body.last_name.as_deref(),
    ) {
        Ok(session) => {
            limiter.reset(&fingerprint);
            set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
            Ok(session_response(
                StatusCode::CREATED,
                "User registered successfully",
                &session,
                state.config().cookie_secure(),
            ))
        }
        Err(err) => {
            limiter.record_attempt(&fingerprint);
            tracing::warn!(%fingerprint, "registration failed");
            Err(err.into())
        }
    }
}

/// Return the current user for a valid session token.
///
/// Responds 401 without a valid token and 404 when the claimed user no
/// longer exists.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> Result<Json<serde_json::Value>> {
    let user = state.auth().user_by_id(UserId::new(claims.user_id))?;
    Ok(Json(json!({ "user": user })))
}

/// Clear the session cookie.
///
/// Tokens themselves cannot be revoked; logout only removes the cookie copy.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = clear_auth_cookie(state.config().cookie_secure());
    with_cookie(
        Json(json!({ "message": "Logged out" })).into_response(),
        &cookie,
    )
}

// =============================================================================
// Helpers
// =============================================================================

fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

/// Build a JSON session response carrying the token in body and cookie.
fn session_response(
    status: StatusCode,
    message: &str,
    session: &AuthSession,
    secure: bool,
) -> Response {
    let cookie = build_auth_cookie(&session.token, secure);
    let response = (
        status,
        Json(json!({
            "message": message,
            "user": session.user,
            "token": session.token,
        })),
    )
        .into_response();

    with_cookie(response, &cookie)
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = header::HeaderValue::from_str(cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}
