//! Customer endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::customer::{Customer, CustomerInput, CustomerPatch},
};

use super::{AppJson, AppPath, AuthenticatedUser};

/// List customers
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of customers", body = Vec<Customer>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_customers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Customer>>> {
    claims.require_read()?;
    let customers = state.services.customers.list().await?;
    Ok(Json(customers))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    request_body = CustomerInput,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_customer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<CustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    claims.require_write()?;
    let customer = state.services.customers.create(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Retrieve a customer
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = Customer),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Customer>> {
    claims.require_read()?;
    let customer = state.services.customers.get_by_id(id).await?;
    Ok(Json(customer))
}

/// Replace a customer
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn replace_customer(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(input): AppJson<CustomerInput>,
) -> AppResult<Json<Customer>> {
    claims.require_write()?;
    let customer = state.services.customers.update(id, input.into()).await?;
    Ok(Json(customer))
}

/// Partially update a customer
#[utoipa::path(
    patch,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = CustomerPatch,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn update_customer(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(patch): AppJson<CustomerPatch>,
) -> AppResult<Json<Customer>> {
    claims.require_write()?;
    let customer = state.services.customers.update(id, patch).await?;
    Ok(Json(customer))
}

/// Delete a customer with no books currently out
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 400, description = "Customer has books borrowed"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<i32>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<StatusCode> {
    claims.require_write()?;
    state.services.customers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
