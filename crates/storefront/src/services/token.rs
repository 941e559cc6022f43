//! Session token service.
//!
//! Sessions are stateless: a signed, time-bounded claim set is the only
//! authorization evidence. There is no refresh and no revocation list -
//! expiry is the sole lifecycle bound, so a compromised token stays valid
//! until it lapses.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::User;

/// Issuer tag embedded in every token.
pub const ISSUER: &str = "debandi-store";

/// Token lifetime.
const TOKEN_TTL_DAYS: i64 = 7;

/// Typed claim set carried by a session token.
///
/// Claims are validated structurally at the verification boundary rather
/// than trusted as arbitrary decoded JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// ID of the authenticated user.
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Email at issuance time.
    pub email: String,
    /// Administrator flag at issuance time.
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Issuer tag ([`ISSUER`]).
    pub iss: String,
    /// Issued-at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature check failed, structure is malformed, issuer mismatches, or
    /// the token has expired. Deliberately opaque: callers cannot distinguish
    /// expired from tampered.
    #[error("invalid token")]
    Invalid,

    /// Token could not be signed.
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies signed session tokens (HS256).
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    ///
    /// The secret is guaranteed present by configuration validation, so
    /// construction cannot fail.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
        }
    }

    /// Issue a token for a user with a fixed 7-day expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if serialization fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user.id.as_i32(),
            email: user.email.as_str().to_owned(),
            is_admin: user.is_admin,
            iss: ISSUER.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] on any failure: bad signature,
    /// malformed structure, wrong issuer, or elapsed expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use debandi_core::{Email, UserId};

    fn service() -> TokenService {
        TokenService::new(&SecretString::from("kJ8#nQ4$wR7&vT2*xZ5^mC9!bL3@pF6j"))
    }

    fn test_user(is_admin: bool) -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("admin@debandi.com").unwrap(),
            first_name: "Admin".to_owned(),
            last_name: "Debandi".to_owned(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let tokens = service();
        let token = tokens.issue(&test_user(true)).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "admin@debandi.com");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, ISSUER);
    }

    #[test]
    fn test_expiry_is_seven_days() {
        let tokens = service();
        let token = tokens.issue(&test_user(false)).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let token = tokens.issue(&test_user(false)).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(matches!(
            tokens.verify(&tampered).unwrap_err(),
            TokenError::Invalid
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().issue(&test_user(false)).unwrap();

        let other = TokenService::new(&SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6j"));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();

        // Sign claims that lapsed an hour ago (past any validation leeway)
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 1,
            email: "admin@debandi.com".to_owned(),
            is_admin: false,
            iss: ISSUER.to_owned(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(matches!(
            tokens.verify(&token).unwrap_err(),
            TokenError::Invalid
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let tokens = service();

        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 1,
            email: "admin@debandi.com".to_owned(),
            is_admin: false,
            iss: "someone-else".to_owned(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::default(), &claims, &tokens.encoding).unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().verify("not-a-token").is_err());
        assert!(service().verify("").is_err());
    }

    #[test]
    fn test_claims_serialize_camel_case() {
        let claims = Claims {
            user_id: 7,
            email: "a@b.co".to_owned(),
            is_admin: true,
            iss: ISSUER.to_owned(),
            iat: 0,
            exp: 1,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["isAdmin"], true);
    }
}
