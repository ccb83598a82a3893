//! User HTTP handlers

use super::model::{User, UserPayload, UserResponse};
use crate::auth::PasswordService;
use crate::core::auth::{AuthPolicy, AuthProvider, RequestContext};
use crate::core::error::CatalogError;
use crate::core::extractors::{Caller, ValidatedBody, parse_entity_id};
use crate::storage::CatalogStore;
use axum::body::Bytes;
use axum::extract::{FromRef, Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::Json;
use std::sync::Arc;

/// User-specific AppState
#[derive(Clone, FromRef)]
pub struct UserAppState {
    #[from_ref(skip)]
    pub store: CatalogStore,
    pub auth: Arc<dyn AuthProvider>,
    #[from_ref(skip)]
    pub passwords: PasswordService,
    #[from_ref(skip)]
    pub list_policy: Arc<AuthPolicy>,
    #[from_ref(skip)]
    pub detail_policy: Arc<AuthPolicy>,
}

pub async fn list_users(
    State(state): State<UserAppState>,
    Caller(identity): Caller,
    method: Method,
) -> Result<Json<Vec<UserResponse>>, CatalogError> {
    state
        .list_policy
        .authorize(&RequestContext::new(method, identity))?;
    Ok(Json(state.store.list_users().await?))
}

pub async fn create_user(
    State(state): State<UserAppState>,
    Caller(identity): Caller,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UserResponse>), CatalogError> {
    state
        .list_policy
        .authorize(&RequestContext::new(method, identity))?;

    let ValidatedBody(payload) = ValidatedBody::<UserPayload>::from_request(&headers, &body)?;
    let password_hash = match payload.password {
        Some(password) => Some(state.passwords.hash(&password).await?),
        None => None,
    };

    let user = state
        .store
        .create_user(User::new(
            payload.username.unwrap_or_default(),
            password_hash,
            payload.is_staff,
        ))
        .await?;

    let response = state.store.user_response(user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_user(
    State(state): State<UserAppState>,
    Caller(identity): Caller,
    method: Method,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, CatalogError> {
    state
        .detail_policy
        .authorize(&RequestContext::new(method, identity))?;

    let id = parse_entity_id::<User>(&id)?;
    let user = state.store.get_user(id).await?;
    Ok(Json(state.store.user_response(user).await?))
}
