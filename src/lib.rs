//! # Catalog API
//!
//! A small product catalog served over HTTP: categories, products owned by
//! the users who created them, and user accounts that authenticate with JWT
//! bearer tokens.
//!
//! ## Features
//!
//! - **Composable authorization**: each endpoint declares an [`AuthPolicy`](core::AuthPolicy)
//!   built from `ReadOnly`, `Authenticated`, `Privileged` and `OwnerOrReadOnly`
//! - **Ownership**: only the owner of a product may change or delete it
//! - **JWT auth**: access and refresh tokens, argon2id password hashes
//! - **Pluggable storage**: one [`DataService`](core::DataService) per entity,
//!   in-memory by default
//! - **YAML configuration** with `CATALOG_*` environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new(AppConfig::load()?)
//!         .with_catalog_entities()
//!         .serve()
//!         .await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        auth::{
            AccessDenied, AccessToken, AuthError, AuthPolicy, AuthProvider, Decision, Identity,
            RequestContext, TokenPair, all_of, any_of,
        },
        entity::{Entity, EntityId, Owned},
        error::CatalogError,
        extractors::{Caller, ValidatedBody, parse_entity_id},
        service::DataService,
    };

    // === Entities ===
    pub use crate::entities::{
        Category, EndpointPolicies, Product, User, catalog_descriptors,
        product::{ProductFilter, ProductResponse},
        user::UserResponse,
    };

    // === Auth ===
    pub use crate::auth::{JwtAuthProvider, JwtKeys, PasswordService};

    // === Storage ===
    pub use crate::storage::{CatalogStore, InMemoryDataService};

    // === Config ===
    pub use crate::config::{AccessConfig, AppConfig, AuthConfig, BootstrapUser, ServerConfig};

    // === Server ===
    pub use crate::server::{
        EntityDescriptor, EntityRegistry, RestExposure, ServerBuilder, ServerHost,
    };

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, State},
        routing::{delete, get, post, put},
    };
}
