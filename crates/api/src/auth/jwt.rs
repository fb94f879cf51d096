//! Bearer access tokens.
//!
//! Tokens are HS256 JWTs whose `sub` is the user id as a decimal string.
//! There is no refresh flow; a client signs in again once its token
//! expires.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use pathway_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type reported to clients alongside the access token.
pub const TOKEN_TYPE: &str = "bearer";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60 * 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, decimal.
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token id (UUID v4).
    pub jti: String,
}

impl Claims {
    fn for_user(user_id: DbId, issued_at: i64, lifetime_secs: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: issued_at + lifetime_secs,
            iat: issued_at,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, expired, or not a JWT at all.
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("token subject '{0}' is not a user id")]
    BadSubject(String),
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load from the environment.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the expiry is not an
    /// integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Sign a token for `user_id`.
    pub fn issue(&self, user_id: DbId) -> Result<IssuedToken, TokenError> {
        let claims = Claims::for_user(
            user_id,
            chrono::Utc::now().timestamp(),
            self.expires_in_secs(),
        );
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(IssuedToken {
            token,
            expires_in: self.expires_in_secs(),
        })
    }

    /// Check signature and expiry, then return the user id.
    pub fn verify(&self, token: &str) -> Result<DbId, TokenError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        claims
            .sub
            .parse()
            .map_err(|_| TokenError::BadSubject(claims.sub))
    }
}
