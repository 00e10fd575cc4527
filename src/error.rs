//! Error types for the library manager server

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    BadValue = 5,
    InvalidReference = 6,
    BookNotAvailable = 7,
    HasOpenLendings = 8,
    LendingNotReturned = 9,
    InvalidReturnDate = 10,
    BadCredentials = 11,
    InvalidToken = 12,
    InsufficientScope = 13,
    UsernameTaken = 14,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Lending rule violation: {0}")]
    Lending(LendingViolation),

    #[error("Bad credentials: {0}")]
    Credentials(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Guard failures on records tied to lending state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingViolation {
    #[error("Author {0} has books borrowed")]
    AuthorHasOpenLendings(String),

    #[error("Customer {0} has books borrowed")]
    CustomerHasOpenLendings(String),

    #[error("This book is currently borrowed by a customer")]
    BookNotAvailable,

    #[error("The book has not been returned yet")]
    NotReturned,

    #[error("Return date cannot be later than today")]
    ReturnDateInFuture,

    #[error("Return date cannot be earlier than the lending date")]
    ReturnDateBeforeLending,
}

impl LendingViolation {
    fn code(&self) -> ErrorCode {
        match self {
            LendingViolation::AuthorHasOpenLendings(_)
            | LendingViolation::CustomerHasOpenLendings(_) => ErrorCode::HasOpenLendings,
            LendingViolation::BookNotAvailable => ErrorCode::BookNotAvailable,
            LendingViolation::NotReturned => ErrorCode::LendingNotReturned,
            LendingViolation::ReturnDateInFuture | LendingViolation::ReturnDateBeforeLending => {
                ErrorCode::InvalidReturnDate
            }
        }
    }
}

impl From<LendingViolation> for AppError {
    fn from(v: LendingViolation) -> Self {
        AppError::Lending(v)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorCode, String) {
        match self {
            AppError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, ErrorCode::InsufficientScope, msg.clone())
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone())
            }
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::InvalidReference(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidReference, msg.clone())
            }
            AppError::Lending(violation) => {
                (StatusCode::BAD_REQUEST, violation.code(), violation.to_string())
            }
            AppError::Credentials(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadCredentials, msg.clone())
            }
            AppError::InvalidToken(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidToken, msg.clone())
            }
            AppError::UsernameTaken(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::UsernameTaken, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
