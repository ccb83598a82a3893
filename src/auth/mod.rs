//! JWT authentication for the catalog
//!
//! - [`jwt`]: HS256 access and refresh tokens
//! - [`password`]: argon2id hashing
//! - [`provider`]: the [`AuthProvider`](crate::core::auth::AuthProvider) used by the server
//! - [`handlers`]: `POST /api/token/` and `POST /api/token/refresh/`

pub mod handlers;
pub mod jwt;
pub mod password;
pub mod provider;

pub use handlers::token_routes;
pub use jwt::{Claims, JwtKeys, TokenType};
pub use password::PasswordService;
pub use provider::JwtAuthProvider;
