//! User repository.
//!
//! The password hash is stored alongside the user but kept out of the [`User`]
//! domain type; it only leaves the repository through [`UserRepository::credentials`],
//! which the login path consumes for hash verification.

use std::collections::HashMap;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use debandi_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::{NewUser, UpdateUser, User};

/// Repository for user records.
pub trait UserRepository: Send + Sync {
    /// Look up a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user together with their password hash, for credential checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn credentials(&self, email: &Email) -> Result<Option<(User, String)>, RepositoryError>;

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    fn create(&self, data: NewUser) -> Result<User, RepositoryError>;

    /// Apply a partial update to a user.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn update(&self, id: UserId, data: UpdateUser) -> Result<Option<User>, RepositoryError>;

    /// Delete a user. Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn delete(&self, id: UserId) -> Result<bool, RepositoryError>;

    /// All users, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backend fails.
    fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
}

struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory, seeded user store.
pub struct MemoryUserRepository {
    records: RwLock<HashMap<UserId, StoredUser>>,
    next_id: AtomicI32,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Number of stored users (test observability).
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<UserId, StoredUser>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<UserId, StoredUser>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MemoryUserRepository {
    fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .read()
            .values()
            .find(|r| &r.user.email == email)
            .map(|r| r.user.clone()))
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.read().get(&id).map(|r| r.user.clone()))
    }

    fn credentials(&self, email: &Email) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .read()
            .values()
            .find(|r| &r.user.email == email)
            .map(|r| (r.user.clone(), r.password_hash.clone())))
    }

    fn create(&self, data: NewUser) -> Result<User, RepositoryError> {
        let mut records = self.write();

        if records.values().any(|r| r.user.email == data.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let user = User {
            id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            is_admin: data.is_admin,
            created_at: Utc::now(),
        };

        records.insert(
            id,
            StoredUser {
                user: user.clone(),
                password_hash: data.password_hash,
            },
        );

        Ok(user)
    }

    fn update(&self, id: UserId, data: UpdateUser) -> Result<Option<User>, RepositoryError> {
        let mut records = self.write();

        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = data.first_name {
            record.user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            record.user.last_name = last_name;
        }
        if let Some(password_hash) = data.password_hash {
            record.password_hash = password_hash;
        }

        Ok(Some(record.user.clone()))
    }

    fn delete(&self, id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.write().remove(&id).is_some())
    }

    fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.read().values().map(|r| r.user.clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}
