//! Axum extractors for callers and request bodies
//!
//! - [`Caller`] resolves the bearer credential of a request to an [`Identity`]
//! - [`ValidatedBody`] deserializes (JSON or form-encoded) and validates a
//!   body once the handler has authorized the request
//! - [`parse_entity_id`] turns a path segment into a primary key

use crate::core::auth::{AuthProvider, Identity};
use crate::core::entity::{Entity, EntityId};
use crate::core::error::{CatalogError, ValidationError};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

/// Identity of the caller, resolved by the application's [`AuthProvider`]
///
/// Extraction never rejects a request for a bad credential: the policy of the
/// endpoint decides whether an anonymous caller is acceptable.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S> FromRequestParts<S> for Caller
where
    Arc<dyn AuthProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let provider: Arc<dyn AuthProvider> = FromRef::from_ref(state);
        let identity = provider.resolve(bearer_token(&parts.headers)).await?;
        Ok(Caller(identity))
    }
}

/// Extract the token of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request body that passed `validator` checks
///
/// Built explicitly from the raw body so that authorization runs before any
/// parsing. An empty body has no fields, so missing fields surface as field
/// errors.
#[derive(Debug, Clone)]
pub struct ValidatedBody<T>(pub T);

impl<T> ValidatedBody<T>
where
    T: DeserializeOwned + Validate,
{
    /// Parse according to the `Content-Type` of the request
    ///
    /// Form-encoded bodies are read as forms; anything else is read as JSON.
    pub fn from_request(headers: &HeaderMap, body: &[u8]) -> Result<Self, CatalogError> {
        if is_form(headers) {
            Self::from_form(body)
        } else {
            Self::from_bytes(body)
        }
    }

    /// Parse a JSON body
    pub fn from_bytes(body: &[u8]) -> Result<Self, CatalogError> {
        let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            body
        };
        let value: T = serde_json::from_slice(body)?;
        Self::validated(value)
    }

    /// Parse an `application/x-www-form-urlencoded` body
    pub fn from_form(body: &[u8]) -> Result<Self, CatalogError> {
        let value: T = serde_urlencoded::from_bytes(body).map_err(|e| {
            CatalogError::Validation(ValidationError::InvalidForm {
                message: e.to_string(),
            })
        })?;
        Self::validated(value)
    }

    fn validated(value: T) -> Result<Self, CatalogError> {
        value.validate()?;
        Ok(Self(value))
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Parse a path segment as the id of a `T`
///
/// Only plain decimal digits name a record (`+1` does not, `01` is `1`).
/// Anything else, zero included, is reported as not found.
pub fn parse_entity_id<T: Entity>(raw: &str) -> Result<EntityId, CatalogError> {
    Some(raw)
        .filter(|raw| !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|raw| raw.parse::<EntityId>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| CatalogError::not_found(T::resource_name_singular(), raw))
}
