//! Bearer-token authentication backed by the catalog's user table

use super::jwt::{JwtKeys, TokenType};
use super::password::PasswordService;
use crate::core::auth::{AccessToken, AuthError, AuthProvider, Identity, TokenPair};
use crate::storage::CatalogStore;
use anyhow::Result;
use async_trait::async_trait;

pub struct JwtAuthProvider {
    store: CatalogStore,
    keys: JwtKeys,
    passwords: PasswordService,
}

impl JwtAuthProvider {
    pub fn new(store: CatalogStore, keys: JwtKeys, passwords: PasswordService) -> Self {
        Self {
            store,
            keys,
            passwords,
        }
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    async fn resolve(&self, credential: Option<&str>) -> Result<Identity> {
        let Some(token) = credential else {
            return Ok(Identity::Anonymous);
        };

        let claims = match self.keys.verify(token, TokenType::Access) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("credential ignored: {}", e);
                return Ok(Identity::Anonymous);
            }
        };

        match self.store.find_user(claims.user_id).await? {
            Some(user) => Ok(user.identity()),
            None => {
                tracing::debug!(user_id = claims.user_id, "token names an unknown user");
                Ok(Identity::Anonymous)
            }
        }
    }

    async fn issue(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let verified = match user.as_ref().and_then(|u| u.password_hash.as_deref()) {
            Some(hash) => self.passwords.verify(password, hash).await?,
            None => false,
        };

        match user {
            Some(user) if verified => {
                tracing::info!(user_id = user.id, "tokens issued");
                Ok(TokenPair {
                    access: self.keys.access_token(user.id)?,
                    refresh: self.keys.refresh_token(user.id)?,
                })
            }
            _ => {
                tracing::warn!("failed login for user: {}", username);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let claims = self.keys.verify(refresh_token, TokenType::Refresh)?;

        let user = self
            .store
            .find_user(claims.user_id)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AccessToken {
            access: self.keys.access_token(user.id)?,
        })
    }
}
