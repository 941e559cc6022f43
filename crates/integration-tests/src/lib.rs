//! Integration tests for the Debandi storefront.
//!
//! The service has no external dependencies, so the tests drive the fully
//! assembled router in-process with `tower::ServiceExt::oneshot` - the same
//! stack the binary serves, without binding a socket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p debandi-integration-tests
//! ```

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use debandi_storefront::config::{Environment, StorefrontConfig};
use debandi_storefront::services::rate_limit::RateLimitConfig;
use debandi_storefront::state::AppState;

/// Signing secret used by all test apps.
pub const TEST_SECRET: &str = "kJ8#nQ4$wR7&vT2*xZ5^mC9!bL3@pF6j";

/// Configuration for an in-process test app.
///
/// Built directly rather than from the environment so tests are hermetic.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("valid test host"),
        port: 0,
        jwt_secret: SecretString::from(TEST_SECRET),
        environment: Environment::Development,
        sentry_dsn: None,
    }
}

/// A fresh app with seeded stores and default rate limits.
///
/// Each test gets its own instance, so rate-limit state never leaks between
/// tests.
#[must_use]
pub fn test_app() -> Router {
    let state = AppState::new(test_config()).expect("failed to build test state");
    debandi_storefront::app(state)
}

/// A fresh app with explicit rate limit bounds.
#[must_use]
pub fn test_app_with_limits(login: RateLimitConfig, register: RateLimitConfig) -> Router {
    let state = AppState::with_rate_limits(test_config(), login, register)
        .expect("failed to build test state");
    debandi_storefront::app(state)
}

/// Send one request through the router and decode the JSON response.
///
/// Returns status, parsed body (Null for non-JSON responses), and headers.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    extra_headers: &[(&str, &str)],
) -> (StatusCode, Value, HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");

    let (parts, body) = response.into_parts();
    let bytes = body
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (parts.status, json, parts.headers)
}

/// Convenience wrapper: JSON request without token or extra headers.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value, HeaderMap) {
    send(app, method, uri, None, Some(body), &[]).await
}

/// Log in and return the session token, asserting success.
pub async fn login_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body, _) = send_json(
        app,
        "POST",
        "/auth/login",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"]
        .as_str()
        .expect("login response missing token")
        .to_owned()
}
