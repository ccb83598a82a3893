//! Product HTTP handlers
//!
//! Every product endpoint authorizes at collection level first. Detail
//! endpoints then load the product and authorize again with its owner, so a
//! missing product is a 404 and a foreign product is a 403 before any body
//! is read.

use super::model::{Product, ProductFilter, ProductPayload, ProductResponse};
use crate::core::auth::{AccessDenied, AuthPolicy, AuthProvider, RequestContext};
use crate::core::entity::Owned;
use crate::core::error::{CatalogError, ValidationError};
use crate::core::extractors::{Caller, ValidatedBody, parse_entity_id};
use crate::storage::CatalogStore;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Json;
use std::sync::Arc;

/// Product-specific AppState
#[derive(Clone, FromRef)]
pub struct ProductAppState {
    #[from_ref(skip)]
    pub store: CatalogStore,
    pub auth: Arc<dyn AuthProvider>,
    #[from_ref(skip)]
    pub policy: Arc<AuthPolicy>,
}

impl ProductAppState {
    /// Load a product and check the caller against its owner
    async fn authorized_product(
        &self,
        ctx: &RequestContext,
        raw_id: &str,
    ) -> Result<Product, CatalogError> {
        let id = parse_entity_id::<Product>(raw_id)?;
        let product = self.store.get_product(id).await?;
        self.policy.authorize(&ctx.with_owner(product.owner_id()))?;
        Ok(product)
    }
}

pub async fn list_products(
    State(state): State<ProductAppState>,
    Caller(identity): Caller,
    method: Method,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, CatalogError> {
    state.policy.authorize(&RequestContext::new(method, identity))?;

    let Query(pairs) = query.map_err(|e| {
        CatalogError::Validation(ValidationError::InvalidQuery {
            message: e.body_text(),
        })
    })?;
    let filter = ProductFilter::from_query_pairs(pairs);
    Ok(Json(state.store.list_products(&filter).await?))
}

pub async fn create_product(
    State(state): State<ProductAppState>,
    Caller(identity): Caller,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogError> {
    let ctx = RequestContext::new(method, identity);
    state.policy.authorize(&ctx)?;

    let owner = ctx
        .identity()
        .user_id()
        .ok_or(AccessDenied::AuthenticationRequired)?;

    let ValidatedBody(payload) = ValidatedBody::<ProductPayload>::from_request(&headers, &body)?;
    let product = state
        .store
        .create_product(payload.into_product(owner)?)
        .await?;

    let response = state.store.product_response(product).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_product(
    State(state): State<ProductAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, CatalogError> {
    let ctx = RequestContext::new(method, identity);
    state.policy.authorize(&ctx)?;

    let product = state.authorized_product(&ctx, &id).await?;
    Ok(Json(state.store.product_response(product).await?))
}

pub async fn update_product(
    State(state): State<ProductAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProductResponse>, CatalogError> {
    let ctx = RequestContext::new(method, identity);
    state.policy.authorize(&ctx)?;

    let product = state.authorized_product(&ctx, &id).await?;

    let ValidatedBody(payload) = ValidatedBody::<ProductPayload>::from_request(&headers, &body)?;
    let updated = state
        .store
        .update_product(product.id, payload.apply_to(&product)?)
        .await?;

    Ok(Json(state.store.product_response(updated).await?))
}

pub async fn delete_product(
    State(state): State<ProductAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogError> {
    let ctx = RequestContext::new(method, identity);
    state.policy.authorize(&ctx)?;

    let product = state.authorized_product(&ctx, &id).await?;
    state.store.delete_product(product.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
