//! Lending endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::lending::{Lending, LendingInput, LendingPatch},
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List lendings
#[utoipa::path(
    get,
    path = "/lendings",
    tag = "lendings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of lendings", body = Vec<Lending>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_lendings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Lending>>> {
    claims.require_read()?;
    let lendings = state.services.lendings.list().await?;
    Ok(Json(lendings))
}

/// Lend a book to a customer
#[utoipa::path(
    post,
    path = "/lendings",
    tag = "lendings",
    security(("bearer_auth" = [])),
    request_body = LendingInput,
    responses(
        (status = 201, description = "Lending created", body = Lending),
        (status = 400, description = "Invalid dates, unknown reference or book already lent out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_lending(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<LendingInput>,
) -> AppResult<(StatusCode, Json<Lending>)> {
    claims.require_write()?;
    let lending = state.services.lendings.create(input).await?;
    Ok((StatusCode::CREATED, Json(lending)))
}

/// Retrieve a lending
#[utoipa::path(
    get,
    path = "/lendings/{id}",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lending ID")),
    responses(
        (status = 200, description = "Lending details", body = Lending),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Lending not found")
    )
)]
pub async fn get_lending(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Lending>> {
    claims.require_read()?;
    let lending = state.services.lendings.get_by_id(id).await?;
    Ok(Json(lending))
}

/// Replace a lending
#[utoipa::path(
    put,
    path = "/lendings/{id}",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lending ID")),
    request_body = LendingInput,
    responses(
        (status = 200, description = "Lending updated", body = Lending),
        (status = 400, description = "Invalid dates, unknown reference or book already lent out"),
        (status = 404, description = "Lending not found")
    )
)]
pub async fn replace_lending(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<LendingInput>,
) -> AppResult<Json<Lending>> {
    claims.require_write()?;
    let lending = state.services.lendings.update(id, input.into()).await?;
    Ok(Json(lending))
}

/// Partially update a lending
#[utoipa::path(
    patch,
    path = "/lendings/{id}",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lending ID")),
    request_body = LendingPatch,
    responses(
        (status = 200, description = "Lending updated", body = Lending),
        (status = 400, description = "Invalid dates, unknown reference or book already lent out"),
        (status = 404, description = "Lending not found")
    )
)]
pub async fn update_lending(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(patch): AppJson<LendingPatch>,
) -> AppResult<Json<Lending>> {
    claims.require_write()?;
    let lending = state.services.lendings.update(id, patch).await?;
    Ok(Json(lending))
}

/// Delete a lending once the book has been returned
#[utoipa::path(
    delete,
    path = "/lendings/{id}",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Lending ID")),
    responses(
        (status = 204, description = "Lending deleted"),
        (status = 400, description = "Book not returned yet"),
        (status = 404, description = "Lending not found")
    )
)]
pub async fn delete_lending(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.lendings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
