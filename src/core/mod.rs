//! Core module containing the fundamental traits and types of the catalog

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod service;

pub use auth::{AccessDenied, AuthPolicy, AuthProvider, Identity, RequestContext, all_of, any_of};
pub use entity::{Entity, EntityId, Owned};
pub use error::CatalogError;
pub use extractors::{Caller, ValidatedBody};
pub use service::DataService;
