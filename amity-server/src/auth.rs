//! JWT authentication.
//!
//! Tokens are HS256-signed and carry the user's ID as `sub`. Handlers take
//! an [`AuthUser`] argument to require a valid `Authorization: Bearer`
//! header.

use amity_core::identity::{User, UserId};
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::MIN_JWT_SECRET_LEN;
use crate::error::AppError;
use crate::state::AppState;

const DEV_SECRET: &str = "amity-dev-mode-secret-not-for-production-use";

/// Payload stored in a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i64,
    /// Username at issue time.
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Issues and verifies tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_seconds: i64,
}

impl TokenIssuer {
    /// Creates an issuer from a secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is shorter than 32 bytes.
    pub fn new(secret: &str, expiry_seconds: u64) -> Result<Self, String> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "JWT secret must be at least {MIN_JWT_SECRET_LEN} bytes"
            ));
        }
        Ok(Self::from_secret(secret, expiry_seconds))
    }

    /// Creates an issuer with a built-in secret for development.
    #[must_use]
    pub fn new_dev(expiry_seconds: u64) -> Self {
        Self::from_secret(DEV_SECRET, expiry_seconds)
    }

    fn from_secret(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds: i64::try_from(expiry_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Issues a token for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.0,
            username: user.username.clone(),
            iat: now,
            exp: now.saturating_add(self.expiry_seconds),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {e}")))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for expired, malformed or
    /// wrongly signed tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                let msg = match err.kind() {
                    ErrorKind::ExpiredSignature => "Token expired",
                    ErrorKind::InvalidSignature => "Invalid signature",
                    _ => "Invalid token",
                };
                AppError::Unauthorized(msg.to_string())
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish_non_exhaustive()
    }
}

/// Extracts the bearer token from an `Authorization` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = state.tokens.verify(token)?;
        Ok(Self(UserId(claims.sub)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId(7),
            name: "Alice".to_string(),
            username: "alice".to_string(),
            avatar: None,
            bio: None,
            created_at: 0,
        }
    }

    #[test]
    fn issue_then_verify() {
        let issuer = TokenIssuer::new_dev(3600);
        let token = issuer.issue(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenIssuer::new(&"a".repeat(32), 3600).unwrap();
        let other = TokenIssuer::new(&"b".repeat(32), 3600).unwrap();
        let token = issuer.issue(&user()).unwrap();

        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(TokenIssuer::new("short", 3600).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = TokenIssuer::new_dev(3600);
        assert!(issuer.verify("not.a.jwt").is_err());
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn debug_hides_keys() {
        let issuer = TokenIssuer::new_dev(60);
        let debug = format!("{issuer:?}");
        assert!(debug.contains("expiry_seconds"));
        assert!(!debug.contains(DEV_SECRET));
    }
}
