//! Entities module - contains the catalog's business entities

pub mod category;
pub mod policies;
pub mod product;
pub mod user;

use crate::server::EntityDescriptor;

// Re-export models for convenience
pub use category::Category;
pub use policies::EndpointPolicies;
pub use product::Product;
pub use user::User;

/// Descriptors of every catalog entity
pub fn catalog_descriptors() -> Vec<Box<dyn EntityDescriptor>> {
    vec![
        Box::new(category::CategoryDescriptor),
        Box::new(product::ProductDescriptor),
        Box::new(user::UserDescriptor),
    ]
}
