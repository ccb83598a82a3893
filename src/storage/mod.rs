//! Storage implementations

pub mod catalog;
pub mod in_memory;

pub use catalog::CatalogStore;
pub use in_memory::InMemoryDataService;
