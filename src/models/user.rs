//! API users, their per-user application and bearer tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// API user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// OAuth2 client type
pub const CLIENT_CONFIDENTIAL: &str = "confidential";
/// Grant type of the per-user applications
pub const GRANT_PASSWORD: &str = "password";

/// Per-user OAuth2 application that tokens are bound to
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub client_type: String,
    pub authorization_grant_type: String,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Name given to the application created for `username`
    pub fn name_for(username: &str) -> String {
        format!("{}_app", username)
    }
}

/// New application to insert
#[derive(Debug)]
pub struct NewApplication {
    pub user_id: i32,
    pub name: String,
    pub client_id: String,
    /// Already hashed
    pub client_secret: String,
}

/// Access token joined with its refresh token
#[derive(Debug, Clone, FromRow)]
pub struct TokenPair {
    pub access_token_id: i32,
    pub user_id: i32,
    pub application_id: i32,
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires: DateTime<Utc>,
}

impl TokenPair {
    /// Whole seconds left before expiry, never negative
    pub fn expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires - now).num_seconds().max(0)
    }
}

/// Freshly generated token values to persist
#[derive(Debug)]
pub struct NewTokenPair {
    pub user_id: i32,
    pub application_id: i32,
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires: DateTime<Utc>,
}

/// Register / token request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password may not be blank"))]
    pub password: String,
}

impl Credentials {
    /// Field rules plus the non-blank password check
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;
        if self.password.trim().is_empty() {
            return Err(AppError::Validation("password: Password may not be blank".to_string()));
        }
        Ok(())
    }
}

/// Refresh request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Revoke request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct RevokeRequest {
    pub token: String,
}

/// Bearer token payload returned by every token endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    /// Always "Bearer"
    pub token_type: String,
    pub scope: String,
}

impl TokenResponse {
    pub fn from_pair(pair: &TokenPair, now: DateTime<Utc>) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            expires_in: pair.expires_in(now),
            token_type: "Bearer".to_string(),
            scope: pair.scope.clone(),
        }
    }
}

/// Identity attached to a request by a valid bearer token
#[derive(Debug, Clone, FromRow)]
pub struct TokenClaims {
    pub user_id: i32,
    pub scope: String,
    pub expires: DateTime<Utc>,
}

impl TokenClaims {
    fn has_scope(&self, wanted: &str) -> bool {
        self.scope.split_whitespace().any(|s| s == wanted)
    }

    pub fn require_read(&self) -> Result<(), AppError> {
        if self.has_scope("read") {
            Ok(())
        } else {
            Err(AppError::Authorization("Token lacks the read scope".to_string()))
        }
    }

    pub fn require_write(&self) -> Result<(), AppError> {
        if self.has_scope("write") {
            Ok(())
        } else {
            Err(AppError::Authorization("Token lacks the write scope".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pair(expires: DateTime<Utc>) -> TokenPair {
        TokenPair {
            access_token_id: 1,
            user_id: 1,
            application_id: 1,
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: "read write".to_string(),
            expires,
        }
    }

    #[test]
    fn test_expires_in_never_negative() {
        let now = Utc::now();
        assert_eq!(pair(now - Duration::seconds(10)).expires_in(now), 0);
        assert_eq!(pair(now + Duration::seconds(3600)).expires_in(now), 3600);
    }

    #[test]
    fn test_token_response_shape() {
        let now = Utc::now();
        let response = TokenResponse::from_pair(&pair(now + Duration::seconds(60)), now);
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.scope, "read write");
        assert_eq!(response.expires_in, 60);
    }

    #[test]
    fn test_scope_checks() {
        let claims = TokenClaims {
            user_id: 1,
            scope: "read".to_string(),
            expires: Utc::now(),
        };
        assert!(claims.require_read().is_ok());
        assert!(matches!(claims.require_write(), Err(AppError::Authorization(_))));
    }

    #[test]
    fn test_any_non_blank_password_is_accepted() {
        let credentials = |password: &str| Credentials {
            username: "alice".to_string(),
            password: password.to_string(),
        };
        assert!(credentials("x").check().is_ok());
        assert!(matches!(credentials("").check(), Err(AppError::Validation(_))));
        assert!(matches!(credentials("   ").check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_application_name() {
        assert_eq!(Application::name_for("alice"), "alice_app");
    }
}
