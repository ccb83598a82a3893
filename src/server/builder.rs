//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::AppConfig;
use crate::core::auth::AuthProvider;
use crate::entities::catalog_descriptors;
use crate::storage::CatalogStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(AppConfig::load()?)
///     .with_catalog_entities()
///     .build()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<CatalogStore>,
    auth: Option<Arc<dyn AuthProvider>>,
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: None,
            auth: None,
            entity_registry: EntityRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Use an existing store instead of a fresh in-memory one
    pub fn with_store(mut self, store: CatalogStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the JWT provider, e.g. with a fixed-identity provider in tests
    pub fn with_auth_provider(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Register a single entity
    pub fn register_entity(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Register categories, products and users
    pub fn with_catalog_entities(mut self) -> Self {
        for descriptor in catalog_descriptors() {
            self.entity_registry.register(descriptor);
        }
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for routes that don't fit the entity pattern. The router
    /// must already carry its state.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the host and create the bootstrap users
    pub async fn build_host(self) -> Result<ServerHost> {
        let (host, _) = self.into_parts().await?;
        Ok(host)
    }

    /// Build the final REST router
    pub async fn build(self) -> Result<Router> {
        let (host, custom_routes) = self.into_parts().await?;
        Ok(RestExposure::build_router(Arc::new(host), custom_routes))
    }

    async fn into_parts(self) -> Result<(ServerHost, Vec<Router>)> {
        self.config.validate()?;

        let store = self.store.unwrap_or_else(CatalogStore::in_memory);
        let host = ServerHost::from_builder_components(
            self.config,
            store,
            self.auth,
            self.entity_registry,
        )?;
        host.seed_bootstrap_users().await?;

        Ok((host, self.custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.host:server.port` from the configuration and stops on
    /// SIGTERM or Ctrl+C.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_address();
        let app = self.build().await?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
