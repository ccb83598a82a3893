//! Typed error handling for the catalog API
//!
//! Handlers return [`CatalogError`], which knows its HTTP status and renders a
//! JSON body of the form `{"code", "message", "details"?}`.
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups of unknown records
//! - [`ValidationError`]: malformed or constraint-violating request bodies
//! - [`RequestError`]: authentication and permission failures
//! - [`ConfigError`]: configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! async fn load(store: &CatalogStore, id: EntityId) -> Result<Category, CatalogError> {
//!     store.get_category(id).await
//! }
//!
//! match load(&store, 3).await {
//!     Ok(category) => println!("Found: {}", category.name),
//!     Err(CatalogError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("Category {} not found", id);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::core::auth::{AccessDenied, AuthError};
use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Value of the `WWW-Authenticate` header sent with 401 responses
pub const BEARER_CHALLENGE: &str = "Bearer realm=\"api\"";

/// The main error type for the catalog API
#[derive(Debug)]
pub enum CatalogError {
    /// Entity-related errors
    Entity(EntityError),

    /// Request body validation errors
    Validation(ValidationError),

    /// Authentication and permission errors
    Request(RequestError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (storage failures, token signing, ...)
    Internal(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Entity(e) => write!(f, "{}", e),
            CatalogError::Validation(e) => write!(f, "{}", e),
            CatalogError::Request(e) => write!(f, "{}", e),
            CatalogError::Config(e) => write!(f, "{}", e),
            CatalogError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Entity(e) => Some(e),
            CatalogError::Validation(e) => Some(e),
            CatalogError::Request(e) => Some(e),
            CatalogError::Config(e) => Some(e),
            CatalogError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Entity(e) => e.status_code(),
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::Request(e) => e.status_code(),
            CatalogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Entity(e) => e.error_code(),
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::Request(e) => e.error_code(),
            CatalogError::Config(_) => "CONFIG_ERROR",
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::Validation(ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Shorthand for an unknown record
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        CatalogError::Entity(EntityError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        })
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CatalogError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id
                }))
            }
            CatalogError::Validation(ValidationError::FieldError { field, message }) => {
                let errors = vec![FieldValidationError {
                    field: field.clone(),
                    message: message.clone(),
                }];
                Some(serde_json::json!({ "fields": errors }))
            }
            CatalogError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(self.to_response());
        let mut response = (status, body).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static(BEARER_CHALLENGE),
            );
        }

        response
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity lookups
#[derive(Debug)]
pub enum EntityError {
    /// Entity was not found
    NotFound { entity_type: String, id: String },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

impl From<EntityError> for CatalogError {
    fn from(err: EntityError) -> Self {
        CatalogError::Entity(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to request body validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Body is not valid JSON for the expected shape
    InvalidJson { message: String },

    /// Form-encoded body does not fit the expected shape
    InvalidForm { message: String },

    /// Query string does not fit the expected shape
    InvalidQuery { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::InvalidForm { message } => {
                write!(f, "Invalid form data: {}", message)
            }
            ValidationError::InvalidQuery { message } => {
                write!(f, "Invalid query string: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Validation(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to the caller of a request
#[derive(Debug)]
pub enum RequestError {
    /// Credential missing or invalid on a request that needs one
    Unauthorized { message: String },

    /// Authenticated caller lacks permission
    Forbidden { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RequestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RequestError::Forbidden { .. } => StatusCode::FORBIDDEN,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::Unauthorized { .. } => "NOT_AUTHENTICATED",
            RequestError::Forbidden { .. } => "PERMISSION_DENIED",
        }
    }
}

impl From<RequestError> for CatalogError {
    fn from(err: RequestError) -> Self {
        CatalogError::Request(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for CatalogError {
    fn from(err: ConfigError) -> Self {
        CatalogError::Config(err)
    }
}

// =============================================================================
// Conversions from other errors
// =============================================================================

impl From<AccessDenied> for CatalogError {
    fn from(denied: AccessDenied) -> Self {
        let message = denied.to_string();
        match denied {
            AccessDenied::AuthenticationRequired => {
                CatalogError::Request(RequestError::Unauthorized { message })
            }
            AccessDenied::Forbidden => CatalogError::Request(RequestError::Forbidden { message }),
        }
    }
}

impl From<AuthError> for CatalogError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::InvalidTokenType => {
                CatalogError::Request(RequestError::Unauthorized {
                    message: err.to_string(),
                })
            }
            AuthError::TokenCreation | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                CatalogError::Internal(err.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        CatalogError::Validation(ValidationError::FieldErrors(fields))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Internal(format!("{:#}", err))
    }
}
