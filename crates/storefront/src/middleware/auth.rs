//! Authentication extractors and session cookie helpers.
//!
//! The session token travels either in the `auth-token` httpOnly cookie or
//! as a bearer header; the cookie wins when both are present.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::services::token::Claims;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Session lifetime in seconds (7 days), mirrored by the token expiry.
const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 7;

/// Extractor that requires a valid session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(claims): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", claims.email)
/// }
/// ```
pub struct RequireAuth(pub Claims);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_owned()))?;

        let claims = state.auth().verify_token(&token)?;
        Ok(Self(claims))
    }
}

/// Extractor that requires a valid session token with the administrator claim.
///
/// Rejects with 401 when unauthenticated and 403 when the token belongs to a
/// non-admin user.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(claims) = RequireAuth::from_request_parts(parts, state).await?;

        if !claims.is_admin {
            tracing::warn!(user_id = claims.user_id, "admin route rejected non-admin");
            return Err(AppError::Forbidden(
                "Administrator access required".to_owned(),
            ));
        }

        Ok(Self(claims))
    }
}

/// Pull the session token from the cookie or the Authorization header.
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(token) = cookie_value(parts, AUTH_COOKIE) {
        return Some(token);
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// Extract a named cookie from the Cookie header.
fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;

    for pair in cookies.split(';') {
        let mut kv = pair.trim().splitn(2, '=');
        if kv.next() == Some(name) {
            return kv.next().filter(|v| !v.is_empty()).map(str::to_owned);
        }
    }

    None
}

/// Build the `Set-Cookie` value carrying a fresh session token.
#[must_use]
pub fn build_auth_cookie(token: &str, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={COOKIE_MAX_AGE}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that clears the session (logout).
#[must_use]
pub fn clear_auth_cookie(secure: bool) -> String {
    let mut cookie = format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
