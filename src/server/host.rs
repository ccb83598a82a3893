//! Server host holding the shared application state
//!
//! The host is built once at startup and handed to every
//! [`EntityDescriptor`](super::EntityDescriptor), which derives the state of
//! its own handlers from it.

use crate::auth::{JwtAuthProvider, JwtKeys, PasswordService};
use crate::config::AppConfig;
use crate::core::auth::AuthProvider;
use crate::entities::{EndpointPolicies, User};
use crate::server::entity_registry::EntityRegistry;
use crate::storage::CatalogStore;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(config, store, registry)?;
/// host.seed_bootstrap_users().await?;
/// let app = RestExposure::build_router(Arc::new(host), vec![]);
/// ```
pub struct ServerHost {
    /// Validated configuration
    pub config: Arc<AppConfig>,

    /// Categories, products and users
    pub store: CatalogStore,

    /// Resolves bearer tokens and issues new ones
    pub auth: Arc<dyn AuthProvider>,

    /// Password hashing shared by login and user creation
    pub passwords: PasswordService,

    /// Policy of each endpoint group
    pub policies: Arc<EndpointPolicies>,

    /// Entity registry for CRUD routes
    pub entity_registry: EntityRegistry,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// Uses a [`JwtAuthProvider`] over `store` unless `auth` is given.
    pub fn from_builder_components(
        config: AppConfig,
        store: CatalogStore,
        auth: Option<Arc<dyn AuthProvider>>,
        entity_registry: EntityRegistry,
    ) -> Result<Self> {
        let passwords = PasswordService::new(&config.auth.password_hashing)?;
        let auth = auth.unwrap_or_else(|| {
            Arc::new(JwtAuthProvider::new(
                store.clone(),
                JwtKeys::from_config(&config.auth),
                passwords.clone(),
            ))
        });
        let policies = Arc::new(EndpointPolicies::from_config(&config.access));

        Ok(Self {
            config: Arc::new(config),
            store,
            auth,
            passwords,
            policies,
            entity_registry,
        })
    }

    /// Host over an empty in-memory store with no entities registered
    pub fn in_memory(config: AppConfig) -> Result<Self> {
        Self::from_builder_components(config, CatalogStore::in_memory(), None, EntityRegistry::new())
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    /// Create the configured bootstrap users that do not exist yet
    ///
    /// Returns the number of accounts created.
    pub async fn seed_bootstrap_users(&self) -> Result<usize> {
        let mut created = 0;
        for account in &self.config.bootstrap_users {
            if self
                .store
                .find_user_by_username(&account.username)
                .await?
                .is_some()
            {
                tracing::debug!(username = %account.username, "bootstrap user already exists");
                continue;
            }

            let hash = self.passwords.hash(&account.password).await?;
            self.store
                .create_user(User::new(
                    account.username.clone(),
                    Some(hash),
                    account.is_staff,
                ))
                .await?;
            created += 1;
        }

        if created > 0 {
            tracing::info!("Seeded {} bootstrap user(s)", created);
        }
        Ok(created)
    }
}
