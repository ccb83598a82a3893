//! Configuration loading for the catalog server
//!
//! Configuration comes from three layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file named by `CATALOG_CONFIG`
//! 3. `CATALOG_*` environment variables
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8000
//! auth:
//!   jwt_secret: change-me
//!   access_token_ttl_secs: 300
//!   refresh_token_ttl_secs: 86400
//! access:
//!   restrict_user_listing: false
//! bootstrap_users:
//!   - username: admin
//!     password: admin
//!     is_staff: true
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";

/// Secret of [`AppConfig::default`]; [`AppConfig::load`] refuses to start with it
pub const DEFAULT_JWT_SECRET: &str = "insecure-development-secret";

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub access: AccessConfig,
    pub bootstrap_users: Vec<BootstrapUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token signing and password hashing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub password_hashing: PasswordHashingConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_ttl_secs: 300,
            refresh_token_ttl_secs: 86_400,
            password_hashing: PasswordHashingConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordHashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Access rules that vary between deployments
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccessConfig {
    /// Only privileged identities may list users
    pub restrict_user_listing: bool,
}

/// Account created at startup when no user with that name exists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Load from `CATALOG_CONFIG` (when set) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load the configuration a server runs with, reading variables through `lookup`
    ///
    /// Unlike [`AppConfig::default`], a loaded configuration must carry its
    /// own signing secret: the built-in one is public.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        let config = config.with_env_overrides_from(&lookup)?;
        config.validate()?;
        if config.auth.uses_default_secret() {
            return Err(invalid(
                "auth.jwt_secret",
                "<default>",
                "must be set through CATALOG_JWT_SECRET or the config file",
            ));
        }
        Ok(config)
    }

    /// Apply `CATALOG_*` overrides read through `lookup`
    pub fn with_env_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CATALOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("CATALOG_PORT") {
            self.server.port = parse_env("CATALOG_PORT", &port)?;
        }
        if let Some(secret) = lookup("CATALOG_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("CATALOG_ACCESS_TOKEN_TTL_SECS") {
            self.auth.access_token_ttl_secs = parse_env("CATALOG_ACCESS_TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(ttl) = lookup("CATALOG_REFRESH_TOKEN_TTL_SECS") {
            self.auth.refresh_token_ttl_secs = parse_env("CATALOG_REFRESH_TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(flag) = lookup("CATALOG_RESTRICT_USER_LISTING") {
            self.access.restrict_user_listing = parse_env("CATALOG_RESTRICT_USER_LISTING", &flag)?;
        }
        Ok(self)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(invalid("auth.jwt_secret", "", "must not be empty"));
        }
        if self.auth.access_token_ttl_secs == 0 {
            return Err(invalid("auth.access_token_ttl_secs", "0", "must be positive"));
        }
        if self.auth.refresh_token_ttl_secs == 0 {
            return Err(invalid("auth.refresh_token_ttl_secs", "0", "must be positive"));
        }

        let hashing = &self.auth.password_hashing;
        if hashing.iterations == 0 {
            return Err(invalid("auth.password_hashing.iterations", "0", "must be positive"));
        }
        if hashing.parallelism == 0 {
            return Err(invalid("auth.password_hashing.parallelism", "0", "must be positive"));
        }
        // argon2 requires at least 8 KiB per lane
        if hashing.memory_kib < hashing.parallelism.saturating_mul(8) {
            return Err(invalid(
                "auth.password_hashing.memory_kib",
                &hashing.memory_kib.to_string(),
                "must be at least 8 KiB per lane",
            ));
        }

        for user in &self.bootstrap_users {
            if user.username.is_empty() || user.password.is_empty() {
                return Err(invalid(
                    "bootstrap_users",
                    &user.username,
                    "username and password must not be empty",
                ));
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(key, raw, "could not be parsed"))
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
