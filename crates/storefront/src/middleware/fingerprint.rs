//! Client fingerprinting for rate limiting.
//!
//! The fingerprint combines the client's network origin with a short digest
//! of the user agent, so distinct clients behind one proxy hop are less
//! likely to share an attempt budget.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Extractor producing the rate-limit key for the requesting client.
///
/// The network origin is taken from the first `x-forwarded-for` hop, then
/// `x-real-ip`; absent both (e.g. direct connections in tests) it degrades to
/// `"unknown"`, which still rate-limits correctly as a single bucket.
pub struct ClientFingerprint(pub String);

impl<S> FromRequestParts<S> for ClientFingerprint
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(fingerprint(&parts.headers)))
    }
}

fn fingerprint(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("unknown");

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    format!("{ip}-{}", digest_base36(user_agent))
}

/// Short non-cryptographic digest of the user agent (base36).
fn digest_base36(s: &str) -> String {
    let mut hash: i32 = 0;
    for c in s.chars() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(c as i32);
    }
    to_base36(hash.unsigned_abs())
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while n > 0 {
        let digit = usize::try_from(n % 36).unwrap_or(0);
        out.push(DIGITS.get(digit).copied().unwrap_or(b'0'));
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
