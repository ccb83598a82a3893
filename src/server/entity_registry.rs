//! Entity registry for managing entity descriptors and their routes

use super::host::ServerHost;
use axum::Router;
use std::collections::BTreeMap;

/// Trait that describes how to build routes for an entity
///
/// Each entity (Category, Product, User) implements this trait to provide
/// its routes. Handlers get their state from the [`ServerHost`].
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "product")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "products")
    fn plural(&self) -> &str;

    /// Build the routes for this entity, with state already applied
    fn build_routes(&self, host: &ServerHost) -> Router;
}

/// Registry for all entities in the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is used as the key; registering the same type
    /// twice keeps the latest descriptor.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered entity routes
    pub fn build_routes(&self, host: &ServerHost) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes(host))
            })
    }

    /// Get all registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
