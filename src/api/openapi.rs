//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, categories, customers, health, lendings, tokens};

/// Registers the bearer token scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Library Management System API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Tokens
        tokens::register,
        tokens::token,
        tokens::refresh_token,
        tokens::revoke_token,
        // Authors
        authors::list_authors,
        authors::create_author,
        authors::get_author,
        authors::replace_author,
        authors::update_author,
        authors::delete_author,
        // Categories
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::replace_category,
        categories::update_category,
        categories::delete_category,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::replace_book,
        books::update_book,
        books::delete_book,
        // Customers
        customers::list_customers,
        customers::create_customer,
        customers::get_customer,
        customers::replace_customer,
        customers::update_customer,
        customers::delete_customer,
        // Lendings
        lendings::list_lendings,
        lendings::create_lending,
        lendings::get_lending,
        lendings::replace_lending,
        lendings::update_lending,
        lendings::delete_lending,
    ),
    components(
        schemas(
            // Tokens
            crate::models::user::Credentials,
            crate::models::user::RefreshRequest,
            crate::models::user::RevokeRequest,
            crate::models::user::TokenResponse,
            tokens::MessageResponse,
            // Records
            crate::models::author::Author,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorPatch,
            crate::models::category::Category,
            crate::models::category::CategoryInput,
            crate::models::category::CategoryPatch,
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookPatch,
            crate::models::customer::Customer,
            crate::models::customer::CustomerInput,
            crate::models::customer::CustomerPatch,
            crate::models::lending::Lending,
            crate::models::lending::LendingInput,
            crate::models::lending::LendingPatch,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tokens", description = "User registration and bearer tokens"),
        (name = "authors", description = "Author management"),
        (name = "categories", description = "Category management"),
        (name = "books", description = "Book management"),
        (name = "customers", description = "Customer management"),
        (name = "lendings", description = "Lending management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
