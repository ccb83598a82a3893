//! Category HTTP handlers

use super::model::{Category, CategoryPayload};
use crate::core::auth::{AuthPolicy, AuthProvider, RequestContext};
use crate::core::error::CatalogError;
use crate::core::extractors::{Caller, ValidatedBody, parse_entity_id};
use crate::storage::CatalogStore;
use axum::body::Bytes;
use axum::extract::{FromRef, Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Json;
use std::sync::Arc;

/// Category-specific AppState
#[derive(Clone, FromRef)]
pub struct CategoryAppState {
    #[from_ref(skip)]
    pub store: CatalogStore,
    pub auth: Arc<dyn AuthProvider>,
    #[from_ref(skip)]
    pub policy: Arc<AuthPolicy>,
}

pub async fn list_categories(
    State(state): State<CategoryAppState>,
    Caller(identity): Caller,
    method: Method,
) -> Result<Json<Vec<Category>>, CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;
    Ok(Json(state.store.list_categories().await?))
}

pub async fn create_category(
    State(state): State<CategoryAppState>,
    Caller(identity): Caller,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Category>), CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;

    let ValidatedBody(payload) = ValidatedBody::<CategoryPayload>::from_request(&headers, &body)?;
    let category = state
        .store
        .create_category(payload.name.unwrap_or_default())
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<CategoryAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
) -> Result<Json<Category>, CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;

    let id = parse_entity_id::<Category>(&id)?;
    Ok(Json(state.store.get_category(id).await?))
}

pub async fn update_category(
    State(state): State<CategoryAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Category>, CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;

    let id = parse_entity_id::<Category>(&id)?;
    state.store.get_category(id).await?;

    let ValidatedBody(payload) = ValidatedBody::<CategoryPayload>::from_request(&headers, &body)?;
    let category = state
        .store
        .update_category(id, payload.name.unwrap_or_default())
        .await?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<CategoryAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;

    let id = parse_entity_id::<Category>(&id)?;
    state.store.delete_category(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
