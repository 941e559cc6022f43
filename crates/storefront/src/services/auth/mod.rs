//! Authentication service.
//!
//! Password registration and login over the user repository, composed with
//! the token service. Control flow for the sensitive endpoints is: rate
//! limiter first (in the handler), then credential verification here, then
//! token issuance.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use debandi_core::{Email, UserId};

use crate::models::user::{NewUser, User};
use crate::services::token::{Claims, TokenService};
use crate::store::{RepositoryError, UserRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Passwords containing any of these substrings are rejected outright.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "qwerty", "abc123", "monkey", "1234567", "letmein",
    "trustno1", "dragon", "baseball", "111111", "iloveyou", "master", "sunshine", "ashley",
    "bailey", "passw0rd", "shadow", "123123", "654321", "superman", "qazwsx", "michael",
    "football",
];

/// A successful authentication: the user (without secret) and a fresh token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Authentication service.
///
/// Handles user registration, login, and token-based user resolution.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password does not verify. Malformed emails fall under the same error
    /// so login reveals nothing about account existence.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .credentials(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(AuthSession { user, token })
    }

    /// Register a new user with email and password.
    ///
    /// The administrator flag is always forced off; admin accounts are seeded,
    /// never self-registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailAlreadyExists` if the normalized email is taken.
    /// Returns `AuthError::PasswordTooShort`, `PasswordTooWeak`, or
    /// `CommonPassword` if the password fails policy.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        let email = Email::parse(email)?;

        if self.users.find_by_email(&email)?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                first_name: first_name.map(str::trim).unwrap_or_default().to_owned(),
                last_name: last_name.map(str::trim).unwrap_or_default().to_owned(),
                is_admin: false,
            })
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailAlreadyExists,
            })?;

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok(AuthSession { user, token })
    }

    /// Verify a session token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token is invalid or expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Resolve the user behind a session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` for an invalid token and
    /// `AuthError::UserNotFound` if the claimed id no longer resolves.
    pub fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.verify_token(token)?;
        self.user_by_id(UserId::new(claims.user_id))
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub fn user_by_id(&self, id: UserId) -> Result<User, AuthError> {
        self.users.find_by_id(id)?.ok_or(AuthError::UserNotFound)
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Hash a password with Argon2 and a random salt (PHC string format).
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash (timing-safe via Argon2).
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` for an unparseable stored hash and
/// `AuthError::InvalidCredentials` on mismatch.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Validate password complexity rules.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_upper || !has_lower || !has_digit {
        return Err(AuthError::PasswordTooWeak);
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|c| lowered.contains(c)) {
        return Err(AuthError::CommonPassword);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    use crate::store::MemoryUserRepository;

    fn service() -> AuthService {
        let users = Arc::new(MemoryUserRepository::new());
        let tokens = TokenService::new(&SecretString::from("kJ8#nQ4$wR7&vT2*xZ5^mC9!bL3@pF6j"));
        AuthService::new(users, tokens)
    }

    #[test]
    fn test_register_then_login() {
        let auth = service();

        let session = auth
            .register("nuevo@debandi.com", "Str0ngTools", Some("Nuevo"), None)
            .unwrap();
        assert_eq!(session.user.email.as_str(), "nuevo@debandi.com");
        assert_eq!(session.user.first_name, "Nuevo");
        assert!(!session.user.is_admin);

        let login = auth.login("nuevo@debandi.com", "Str0ngTools").unwrap();
        assert_eq!(login.user.id, session.user.id);
    }

    #[test]
    fn test_registration_never_grants_admin() {
        let auth = service();
        let session = auth
            .register("eleva@debandi.com", "Str0ngTools", None, None)
            .unwrap();
        assert!(!session.user.is_admin);

        let claims = auth.verify_token(&session.token).unwrap();
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitively() {
        let auth = service();
        auth.register("dup@debandi.com", "Str0ngTools", None, None)
            .unwrap();

        let err = auth
            .register("DUP@Debandi.COM", "Str0ngTools", None, None)
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyExists));
    }

    #[test]
    fn test_password_policy() {
        let auth = service();

        assert!(matches!(
            auth.register("a@debandi.com", "Ab1", None, None),
            Err(AuthError::PasswordTooShort)
        ));
        assert!(matches!(
            auth.register("a@debandi.com", "alllowercase1", None, None),
            Err(AuthError::PasswordTooWeak)
        ));
        assert!(matches!(
            auth.register("a@debandi.com", "NODIGITSHERE", None, None),
            Err(AuthError::PasswordTooWeak)
        ));
        assert!(matches!(
            auth.register("a@debandi.com", "Password1", None, None),
            Err(AuthError::CommonPassword)
        ));
    }

    #[test]
    fn test_login_wrong_password() {
        let auth = service();
        auth.register("user@debandi.com", "Str0ngTools", None, None)
            .unwrap();

        assert!(matches!(
            auth.login("user@debandi.com", "WrongPass1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_unknown_email() {
        let auth = service();
        assert!(matches!(
            auth.login("ghost@debandi.com", "Str0ngTools"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_malformed_email_is_invalid_credentials() {
        let auth = service();
        assert!(matches!(
            auth.login("not-an-email", "Str0ngTools"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_stored_secret_is_not_plaintext() {
        let hash = hash_password("Str0ngTools").unwrap();
        assert_ne!(hash, "Str0ngTools");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Str0ngTools", &hash).is_ok());
        assert!(verify_password("Other1Pass", &hash).is_err());
    }

    #[test]
    fn test_current_user_roundtrip() {
        let auth = service();
        let session = auth
            .register("token@debandi.com", "Str0ngTools", None, None)
            .unwrap();

        let user = auth.current_user(&session.token).unwrap();
        assert_eq!(user.id, session.user.id);
    }

    #[test]
    fn test_current_user_invalid_token() {
        let auth = service();
        assert!(matches!(
            auth.current_user("garbage"),
            Err(AuthError::Token(_))
        ));
    }

    #[test]
    fn test_current_user_deleted_user() {
        let users = Arc::new(MemoryUserRepository::new());
        let tokens = TokenService::new(&SecretString::from("kJ8#nQ4$wR7&vT2*xZ5^mC9!bL3@pF6j"));
        let auth = AuthService::new(Arc::clone(&users) as Arc<dyn UserRepository>, tokens);

        let session = auth
            .register("gone@debandi.com", "Str0ngTools", None, None)
            .unwrap();
        users.delete(session.user.id).unwrap();

        assert!(matches!(
            auth.current_user(&session.token),
            Err(AuthError::UserNotFound)
        ));
    }
}
