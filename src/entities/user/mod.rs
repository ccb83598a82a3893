//! User entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::UserDescriptor;
pub use model::{USERNAME_PATTERN, User, UserPayload, UserResponse};
