//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Auth
//! POST /auth/login             - Login with email/password (rate limited)
//! POST /auth/register          - Register a new account (rate limited)
//! GET  /auth/me                - Current user from session token
//! POST /auth/logout            - Clear the session cookie
//!
//! # Products
//! GET  /products               - Listing with category/search/page filters
//! GET  /products/search?q=     - Catalog search (min 2 characters)
//! GET  /products/{slug}        - Product detail
//!
//! # Admin (administrator claim required)
//! GET    /admin/products       - Full catalog
//! POST   /admin/products       - Create product
//! PUT    /admin/products/{id}  - Update product
//! DELETE /admin/products/{id}  - Delete product
//! ```

pub mod admin;
pub mod auth;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
        .route("/{slug}", get(products::show))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::index).post(admin::create))
        .route(
            "/products/{id}",
            put(admin::update).delete(admin::destroy),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/admin", admin_routes())
}
