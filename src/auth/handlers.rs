//! Token endpoints

use crate::core::auth::{AccessToken, AuthProvider, TokenPair};
use crate::core::error::CatalogError;
use crate::core::extractors::ValidatedBody;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct TokenAppState {
    pub auth: Arc<dyn AuthProvider>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub refresh: Option<String>,
}

/// `POST /api/token/`
pub async fn obtain_token(
    State(state): State<TokenAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenPair>, CatalogError> {
    let ValidatedBody(request) = ValidatedBody::<TokenRequest>::from_request(&headers, &body)?;
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let pair = state.auth.issue(&username, &password).await?;
    Ok(Json(pair))
}

/// `POST /api/token/refresh/`
pub async fn refresh_token(
    State(state): State<TokenAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AccessToken>, CatalogError> {
    let ValidatedBody(request) = ValidatedBody::<RefreshRequest>::from_request(&headers, &body)?;
    let refresh = request.refresh.unwrap_or_default();

    let access = state.auth.refresh(&refresh).await?;
    Ok(Json(access))
}

/// Routes of the token endpoints
pub fn token_routes(auth: Arc<dyn AuthProvider>) -> Router {
    Router::new()
        .route("/api/token/", post(obtain_token))
        .route("/api/token/refresh/", post(refresh_token))
        .with_state(TokenAppState { auth })
}
