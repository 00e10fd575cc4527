//! User registration and token endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{Credentials, RefreshRequest, RevokeRequest, TokenResponse},
};

use super::AppJson;

/// Plain message response
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a user and issue their first token pair
#[utoipa::path(
    post,
    path = "/user-register",
    tag = "tokens",
    request_body = Credentials,
    responses(
        (status = 200, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid input or username already taken")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.services.tokens.register(credentials).await?;
    Ok(Json(response))
}

/// Get a token pair with username and password
#[utoipa::path(
    post,
    path = "/user-token",
    tag = "tokens",
    request_body = Credentials,
    responses(
        (status = 200, description = "Token pair", body = TokenResponse),
        (status = 400, description = "User not found or wrong credentials")
    )
)]
pub async fn token(
    State(state): State<crate::AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.services.tokens.token(credentials).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/user-token/refresh",
    tag = "tokens",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Refreshed token pair", body = TokenResponse),
        (status = 400, description = "Invalid refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let response = state.services.tokens.refresh(request).await?;
    Ok(Json(response))
}

/// Revoke an access token
#[utoipa::path(
    post,
    path = "/user-token/revoke",
    tag = "tokens",
    request_body = RevokeRequest,
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 400, description = "Invalid token")
    )
)]
pub async fn revoke_token(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<RevokeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state.services.tokens.revoke(request).await?;
    Ok(Json(MessageResponse {
        message: "Token revoked".to_string(),
    }))
}
