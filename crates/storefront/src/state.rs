//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::auth::AuthService;
use crate::services::products::ProductService;
use crate::services::rate_limit::{RateLimitConfig, RateLimiter, SWEEP_INTERVAL};
use crate::services::token::TokenService;
use crate::store::seed::{self, SeedError};
use crate::store::{ProductRepository, UserRepository};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like repositories, services, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    auth: AuthService,
    catalog: ProductService,
    login_limiter: RateLimiter,
    register_limiter: RateLimiter,
}

impl AppState {
    /// Create application state with seeded stores and default rate limits.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the in-memory stores fails.
    pub fn new(config: StorefrontConfig) -> Result<Self, SeedError> {
        Self::with_rate_limits(
            config,
            RateLimitConfig::login(),
            RateLimitConfig::register(),
        )
    }

    /// Create application state with explicit rate limit bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding the in-memory stores fails.
    pub fn with_rate_limits(
        config: StorefrontConfig,
        login: RateLimitConfig,
        register: RateLimitConfig,
    ) -> Result<Self, SeedError> {
        let tokens = TokenService::new(&config.jwt_secret);

        let users: Arc<dyn UserRepository> = Arc::new(seed::users()?);
        let products: Arc<dyn ProductRepository> = Arc::new(seed::products()?);

        let auth = AuthService::new(users, tokens);
        let catalog = ProductService::new(products);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                auth,
                catalog,
                login_limiter: RateLimiter::new(login),
                register_limiter: RateLimiter::new(register),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the product catalog service.
    #[must_use]
    pub fn catalog(&self) -> &ProductService {
        &self.inner.catalog
    }

    /// Get a reference to the login rate limiter.
    #[must_use]
    pub fn login_limiter(&self) -> &RateLimiter {
        &self.inner.login_limiter
    }

    /// Get a reference to the registration rate limiter.
    #[must_use]
    pub fn register_limiter(&self) -> &RateLimiter {
        &self.inner.register_limiter
    }

    /// Start the background task that sweeps expired rate-limit records.
    ///
    /// Lookups self-heal on expiry, so the sweep exists to bound memory
    /// growth under many distinct client fingerprints.
    pub fn start_rate_limit_sweeper(&self) {
        let state = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                state.login_limiter().sweep();
                state.register_limiter().sweep();
                tracing::debug!("swept expired rate limit records");
            }
        });
    }
}
