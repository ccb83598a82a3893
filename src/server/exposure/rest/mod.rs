//! REST API exposure
//!
//! Consumes a `ServerHost` and produces the Axum `Router` serving the
//! catalog over HTTP.

use super::super::host::ServerHost;
use crate::auth::token_routes;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Token routes
    /// - Entity routes
    /// - Custom routes
    ///
    /// and a `TraceLayer` around all of them.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes()
            .merge(token_routes(host.auth.clone()))
            .merge(host.entity_registry.build_routes(&host));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(TraceLayer::new_for_http())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "catalog-api"
        }))
    }
}
