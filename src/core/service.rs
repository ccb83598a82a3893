//! Service trait for entity storage

use crate::core::entity::{Entity, EntityId};
use anyhow::Result;
use async_trait::async_trait;

/// Service trait for managing catalog entities
///
/// Implementations provide CRUD operations for a specific entity type.
/// Cross-entity rules (foreign keys, cascades) live one level up in
/// [`CatalogStore`](crate::storage::CatalogStore).
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity, assigning it the next id
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: EntityId) -> Result<Option<T>>;

    /// List all entities ordered by id
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing entity
    async fn update(&self, id: EntityId, entity: T) -> Result<T>;

    /// Delete an entity, returning whether it existed
    async fn delete(&self, id: EntityId) -> Result<bool>;

    /// Find entities whose indexed `field` equals `value`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// Delete every entity whose indexed `field` equals `value`
    async fn delete_where(&self, field: &str, value: &str) -> Result<usize>;
}
