//! HS256 bearer tokens carrying the caller's identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::config;

/// Caller identity, injected into request extensions by the auth middleware
/// and passed explicitly to services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims for `user` that expire after the configured token lifetime.
    pub fn for_user(user: &AuthUser) -> Self {
        // Capped at ten years to stay inside chrono's Duration range
        let hours = config().security.jwt_expiry_hours.min(24 * 365 * 10) as i64;
        Self::with_lifetime(user, Duration::hours(hours))
    }

    fn with_lifetime(user: &AuthUser, lifetime: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user.user_id.clone(),
            name: user.user_name.clone(),
            email: user.user_email.clone(),
            role: user.role.clone(),
            exp: (issued + lifetime).timestamp(),
            iat: issued.timestamp(),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            user_name: claims.name,
            user_email: claims.email,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    sign(claims, &config().security.jwt_secret)
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    verify(token, &config().security.jwt_secret)
}

fn sign(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).map_err(JwtError::Encode)
}

fn verify(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
        .map_err(JwtError::Decode)
}
