//! Brute-force throttling tests for the sensitive endpoints.

use axum::http::StatusCode;
use serde_json::json;

use debandi_integration_tests::{send, send_json, test_app, test_app_with_limits};
use debandi_storefront::services::rate_limit::RateLimitConfig;

/// Login attempt with a fixed fingerprint (forwarded IP + user agent).
async fn login_as(
    app: &axum::Router,
    ip: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let (status, body, _) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "admin@debandi.com", "password": password })),
        &[("x-forwarded-for", ip), ("user-agent", "integration-suite")],
    )
    .await;
    (status, body)
}

#[tokio::test]
async fn sixth_rapid_failure_is_rate_limited() {
    let app = test_app();

    // Five wrong-password attempts exhaust the login budget
    for attempt in 1..=5 {
        let (status, _) = login_as(&app, "203.0.113.9", "wrong-pass").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "attempt {attempt}");
    }

    // The sixth call is rejected before credentials are even checked -
    // the correct password makes no difference
    let (status, body) = login_as(&app, "203.0.113.9", "admin123").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Too many attempts, please try again later");

    let reset_time = body["resetTime"].as_i64().expect("resetTime in 429 body");
    assert!(reset_time > chrono::Utc::now().timestamp_millis());
}

#[tokio::test]
async fn successful_login_forgives_prior_failures() {
    let app = test_app();

    for _ in 0..4 {
        let (status, _) = login_as(&app, "203.0.113.10", "wrong-pass").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // Success resets the window
    let (status, _) = login_as(&app, "203.0.113.10", "admin123").await;
    assert_eq!(status, StatusCode::OK);

    // A previously-failing password is treated as attempt 1 of a fresh
    // window: without the reset, the second of these would be throttled
    let (status, _) = login_as(&app, "203.0.113.10", "wrong-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login_as(&app, "203.0.113.10", "wrong-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fingerprints_are_throttled_independently() {
    let app = test_app();

    for _ in 0..5 {
        let (status, _) = login_as(&app, "203.0.113.11", "wrong-pass").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = login_as(&app, "203.0.113.11", "wrong-pass").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // A different client IP still gets its own budget
    let (status, _) = login_as(&app, "198.51.100.7", "admin123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn registration_budget_is_stricter() {
    let app = test_app();

    // Three failed registrations (weak password) spend the budget
    for _ in 0..3 {
        let (status, _, _) = send_json(
            &app,
            "POST",
            "/auth/register",
            json!({ "email": "reg@debandi.com", "password": "weakpass1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // The fourth attempt is throttled even though the payload is valid
    let (status, body, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({ "email": "reg@debandi.com", "password": "Str0ngTools" }),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["resetTime"].is_i64());
}

#[tokio::test]
async fn window_lapse_restores_the_budget() {
    let app = test_app_with_limits(
        RateLimitConfig {
            max_attempts: 1,
            window: chrono::Duration::milliseconds(80),
        },
        RateLimitConfig::register(),
    );

    let (status, _) = login_as(&app, "203.0.113.12", "wrong-pass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login_as(&app, "203.0.113.12", "admin123").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Expiry is lazy: once the window lapses, the next lookup self-heals
    tokio::time::sleep(std::time::Duration::from_millis(120)).await;
    let (status, _) = login_as(&app, "203.0.113.12", "admin123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn successful_registration_resets_its_budget() {
    let app = test_app();

    for _ in 0..2 {
        let (status, _, _) = send_json(
            &app,
            "POST",
            "/auth/register",
            json!({ "email": "fresh@debandi.com", "password": "weakpass1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({ "email": "fresh@debandi.com", "password": "Str0ngTools" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Budget is fresh again after the success
    let (status, _, _) = send_json(
        &app,
        "POST",
        "/auth/register",
        json!({ "email": "fresh2@debandi.com", "password": "weakpass1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
