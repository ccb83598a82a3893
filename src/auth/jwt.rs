//! HS256 token signing and verification

use crate::config::AuthConfig;
use crate::core::auth::AuthError;
use crate::core::entity::EntityId;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Id of the user the token was issued to
    pub user_id: EntityId,
    pub token_type: TokenType,
    /// Expiration time (timestamp)
    pub exp: i64,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    fn new(user_id: EntityId, token_type: TokenType, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            token_type,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// Signing keys and lifetimes for access and refresh tokens
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            seconds(config.access_token_ttl_secs),
            seconds(config.refresh_token_ttl_secs),
        )
    }

    pub fn access_token(&self, user_id: EntityId) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id, TokenType::Access, self.access_ttl))
    }

    pub fn refresh_token(&self, user_id: EntityId) -> Result<String, AuthError> {
        self.sign(&Claims::new(user_id, TokenType::Refresh, self.refresh_ttl))
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Verify signature and expiry, then check the token type
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => tracing::debug!("token expired"),
                    kind => tracing::debug!("token rejected: {:?}", kind),
                }
                AuthError::InvalidToken
            })?
            .claims;

        if claims.token_type != expected {
            return Err(AuthError::InvalidTokenType);
        }
        Ok(claims)
    }
}

// Lifetimes are capped at roughly a century
const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}
