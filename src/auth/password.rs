//! Argon2id password hashing on the blocking thread pool

use crate::config::PasswordHashingConfig;
use crate::core::auth::AuthError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    pub fn new(config: &PasswordHashingConfig) -> Result<Self, AuthError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Self { params })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` into a PHC string
    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AuthError::PasswordHash(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
    }

    /// Check `password` against a stored PHC string
    ///
    /// A malformed stored hash never matches.
    pub async fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher();
        let password = password.to_owned();
        let stored = stored.to_owned();

        tokio::task::spawn_blocking(move || match PasswordHash::new(&stored) {
            Ok(parsed) => hasher.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                tracing::warn!("stored password hash is malformed: {}", e);
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))
    }
}
