//! Brute-force rate limiting for sensitive endpoints.
//!
//! Tracks attempt counts per client fingerprint within a fixed window. Each
//! sensitive endpoint gets its own limiter instance with independent bounds
//! (registration is stricter than login). Expiry is lazy - a lapsed window is
//! treated as absent on the next access - and a periodic sweep removes stale
//! records so memory stays bounded under many distinct fingerprints.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Sweep cadence for the background cleanup task.
pub const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// Configuration for a rate limiter instance.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Attempts allowed within one window.
    pub max_attempts: u32,
    /// Window length; the counter resets when it lapses.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Login bound: 5 attempts per 15 minutes.
    #[must_use]
    pub fn login() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::minutes(15),
        }
    }

    /// Registration bound: 3 attempts per hour.
    #[must_use]
    pub fn register() -> Self {
        Self {
            max_attempts: 3,
            window: Duration::hours(1),
        }
    }
}

/// Client-facing limiter state for 429 messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limited: bool,
    pub attempts_remaining: u32,
    /// When the current window resets; `None` when no live record exists.
    pub reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct AttemptRecord {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Windowed attempt counter keyed by client fingerprint.
///
/// Thread-safe; shared across request handlers via `Arc`.
pub struct RateLimiter {
    config: RateLimitConfig,
    records: RwLock<HashMap<String, AttemptRecord>>,
}

impl RateLimiter {
    /// Create a limiter with the given bounds.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// True iff a non-expired record has reached the attempt budget.
    #[must_use]
    pub fn is_limited(&self, key: &str) -> bool {
        let records = self.read();
        records
            .get(key)
            .is_some_and(|r| r.reset_at > Utc::now() && r.count >= self.config.max_attempts)
    }

    /// Record an attempt: increments the live window, or opens a fresh one if
    /// none exists or the previous window lapsed.
    pub fn record_attempt(&self, key: &str) {
        let now = Utc::now();
        let mut records = self.write();

        match records.get_mut(key) {
            Some(record) if record.reset_at > now => {
                record.count += 1;
            }
            _ => {
                records.insert(
                    key.to_owned(),
                    AttemptRecord {
                        count: 1,
                        reset_at: now + self.config.window,
                    },
                );
            }
        }
    }

    /// Forget a fingerprint entirely (called after successful
    /// authentication so prior failures are forgiven).
    pub fn reset(&self, key: &str) {
        self.write().remove(key);
    }

    /// Report remaining attempts and reset time for client messaging.
    #[must_use]
    pub fn status(&self, key: &str) -> RateLimitStatus {
        let records = self.read();
        let now = Utc::now();

        match records.get(key) {
            Some(record) if record.reset_at > now => RateLimitStatus {
                limited: record.count >= self.config.max_attempts,
                attempts_remaining: self.config.max_attempts.saturating_sub(record.count),
                reset_at: Some(record.reset_at),
            },
            _ => RateLimitStatus {
                limited: false,
                attempts_remaining: self.config.max_attempts,
                reset_at: None,
            },
        }
    }

    /// Drop expired records. Lookups self-heal on expiry, so this only bounds
    /// memory growth under many distinct fingerprints.
    pub fn sweep(&self) {
        let now = Utc::now();
        self.write().retain(|_, record| record.reset_at > now);
    }

    /// Number of tracked fingerprints (test observability).
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AttemptRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, AttemptRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &str = "203.0.113.9-ua1";

    fn limiter(max_attempts: u32, window: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_attempts,
            window,
        })
    }

    #[test]
    fn test_unknown_key_is_not_limited() {
        let limiter = limiter(5, Duration::minutes(15));
        assert!(!limiter.is_limited(KEY));

        let status = limiter.status(KEY);
        assert!(!status.limited);
        assert_eq!(status.attempts_remaining, 5);
        assert!(status.reset_at.is_none());
    }

    #[test]
    fn test_limited_after_max_attempts() {
        let limiter = limiter(3, Duration::minutes(15));

        limiter.record_attempt(KEY);
        limiter.record_attempt(KEY);
        assert!(!limiter.is_limited(KEY));

        limiter.record_attempt(KEY);
        assert!(limiter.is_limited(KEY));

        let status = limiter.status(KEY);
        assert!(status.limited);
        assert_eq!(status.attempts_remaining, 0);
        assert!(status.reset_at.is_some());
    }

    #[test]
    fn test_reset_forgives_failures() {
        let limiter = limiter(2, Duration::minutes(15));
        limiter.record_attempt(KEY);
        limiter.record_attempt(KEY);
        assert!(limiter.is_limited(KEY));

        limiter.reset(KEY);
        assert!(!limiter.is_limited(KEY));
        assert_eq!(limiter.status(KEY).attempts_remaining, 2);

        // The next failure opens a fresh window counted from 1
        limiter.record_attempt(KEY);
        assert_eq!(limiter.status(KEY).attempts_remaining, 1);
    }

    #[test]
    fn test_window_expiry_self_heals() {
        let limiter = limiter(1, Duration::milliseconds(40));
        limiter.record_attempt(KEY);
        assert!(limiter.is_limited(KEY));

        std::thread::sleep(std::time::Duration::from_millis(60));
        assert!(!limiter.is_limited(KEY));

        // A new attempt starts a fresh window rather than resuming the old count
        limiter.record_attempt(KEY);
        assert_eq!(limiter.status(KEY).attempts_remaining, 0);
        assert!(limiter.is_limited(KEY));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1, Duration::minutes(15));
        limiter.record_attempt(KEY);
        assert!(limiter.is_limited(KEY));
        assert!(!limiter.is_limited("198.51.100.7-ua2"));
    }

    #[test]
    fn test_sweep_drops_expired_records() {
        let limiter = limiter(5, Duration::milliseconds(40));
        limiter.record_attempt(KEY);
        limiter.record_attempt("198.51.100.7-ua2");
        assert_eq!(limiter.tracked_count(), 2);

        std::thread::sleep(std::time::Duration::from_millis(60));
        limiter.sweep();
        assert_eq!(limiter.tracked_count(), 0);
    }

    #[test]
    fn test_sweep_keeps_live_records() {
        let limiter = limiter(5, Duration::minutes(15));
        limiter.record_attempt(KEY);
        limiter.sweep();
        assert_eq!(limiter.tracked_count(), 1);
    }

    #[test]
    fn test_default_bounds() {
        let login = RateLimitConfig::login();
        assert_eq!(login.max_attempts, 5);
        assert_eq!(login.window, Duration::minutes(15));

        let register = RateLimitConfig::register();
        assert_eq!(register.max_attempts, 3);
        assert_eq!(register.window, Duration::hours(1));
    }
}
