//! HTTP middleware and extractors for the storefront.
//!
//! # Layer Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. Request ID (add unique ID to each request)
//! 3. Security headers
//!
//! Authentication and client fingerprinting are extractors rather than
//! layers: handlers opt in per route.

pub mod auth;
pub mod fingerprint;
pub mod request_id;
pub mod security_headers;

pub use auth::{AUTH_COOKIE, RequireAdmin, RequireAuth, build_auth_cookie, clear_auth_cookie};
pub use fingerprint::ClientFingerprint;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
