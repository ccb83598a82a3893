//! Server module for building the HTTP server
//!
//! [`ServerBuilder`] assembles a [`ServerHost`] from the configuration, the
//! store and the registered entities, then exposes it over REST.

pub mod builder;
pub mod entity_registry;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use exposure::RestExposure;
pub use host::ServerHost;
