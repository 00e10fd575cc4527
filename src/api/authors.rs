//! Author endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::author::{Author, AuthorInput, AuthorPatch},
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Author>>> {
    claims.require_read()?;
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_write()?;
    let author = state.services.authors.create(input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Retrieve an author
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Author>> {
    claims.require_read()?;
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Replace an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn replace_author(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<AuthorInput>,
) -> AppResult<Json<Author>> {
    claims.require_write()?;
    let author = state.services.authors.update(id, input.into()).await?;
    Ok(Json(author))
}

/// Partially update an author
#[utoipa::path(
    patch,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPatch,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(patch): AppJson<AuthorPatch>,
) -> AppResult<Json<Author>> {
    claims.require_write()?;
    let author = state.services.authors.update(id, patch).await?;
    Ok(Json(author))
}

/// Delete an author with no books currently lent out
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 400, description = "Author has books borrowed"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
