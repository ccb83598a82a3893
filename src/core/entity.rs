//! Entity traits defining the core abstraction for catalog records

/// Primary key type shared by every catalog resource.
///
/// Keys are assigned by the store, start at 1 and are never reused within a table.
pub type EntityId = u64;

/// Base trait for all entities persisted by a [`DataService`](crate::core::DataService).
///
/// An entity knows its resource names (used in routes and error messages),
/// carries a store-assigned id, and exposes a small set of indexed fields
/// that can be searched by exact value.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name (e.g., "categories", "products")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "category", "product")
    fn resource_name_singular() -> &'static str;

    /// Get the identifier of this entity instance
    fn id(&self) -> EntityId;

    /// Assign the identifier chosen by the store on creation
    fn set_id(&mut self, id: EntityId);

    /// Fields that can be used with `DataService::search`
    fn indexed_fields() -> &'static [&'static str];

    /// Get the value of an indexed field rendered as a string
    fn field_value(&self, field: &str) -> Option<String>;
}

/// Entities recorded against the identity that created them.
///
/// The owner is the only subject allowed to mutate the entity once it exists.
pub trait Owned: Entity {
    fn owner_id(&self) -> EntityId;
}
