//! Business logic services.
//!
//! Services own the domain rules and sit between the route handlers and the
//! repositories. Authorization is not checked here - admin gating happens in
//! the extractors upstream.

pub mod auth;
pub mod products;
pub mod rate_limit;
pub mod token;

pub use auth::{AuthError, AuthService, AuthSession};
pub use products::{ProductError, ProductService};
pub use rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};
pub use token::{Claims, TokenError, TokenService};
