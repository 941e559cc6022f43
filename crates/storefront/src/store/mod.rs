//! Storage layer for the storefront.
//!
//! Repositories are injected as trait objects so the storage engine is a
//! deployment decision: the process ships with seeded in-memory
//! implementations ([`MemoryUserRepository`], [`MemoryProductRepository`]),
//! and a persistent backend can be slotted in behind the same traits without
//! touching the service layer.
//!
//! The in-memory stores are thread-safe: state lives behind `RwLock` maps and
//! IDs come from an atomic allocator, so concurrent requests cannot mint
//! duplicate IDs.

pub mod products;
pub mod seed;
pub mod users;

pub use products::{CreateProduct, MemoryProductRepository, ProductRepository};
pub use users::{MemoryUserRepository, UserRepository};

use thiserror::Error;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A uniqueness constraint was violated (duplicate email or slug).
    #[error("conflict: {0}")]
    Conflict(String),
}
