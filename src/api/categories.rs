//! Category endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::category::{Category, CategoryInput, CategoryPatch},
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Category>>> {
    claims.require_read()?;
    let categories = state.services.categories.list().await?;
    Ok(Json(categories))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = Category)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<CategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    claims.require_write()?;
    let category = state.services.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Retrieve a category
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = Category),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Category>> {
    claims.require_read()?;
    let category = state.services.categories.get_by_id(id).await?;
    Ok(Json(category))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryInput,
    responses(
        (status = 200, description = "Category updated", body = Category)
    )
)]
pub async fn replace_category(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<CategoryInput>,
) -> AppResult<Json<Category>> {
    claims.require_write()?;
    let category = state.services.categories.update(id, input.into()).await?;
    Ok(Json(category))
}

/// Partially update a category
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated", body = Category)
    )
)]
pub async fn update_category(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(patch): AppJson<CategoryPatch>,
) -> AppResult<Json<Category>> {
    claims.require_write()?;
    let category = state.services.categories.update(id, patch).await?;
    Ok(Json(category))
}

/// Delete a category and its books
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
