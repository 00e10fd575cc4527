//! User registration and bearer token lifecycle

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        Application, Credentials, NewApplication, NewTokenPair, RefreshRequest, RevokeRequest,
        TokenClaims, TokenPair, TokenResponse, User,
    },
    repository::Repository,
};

const TOKEN_LENGTH: usize = 30;
const CLIENT_ID_LENGTH: usize = 40;
const CLIENT_SECRET_LENGTH: usize = 128;

/// Random ASCII alphanumeric string
fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// New opaque token value
pub fn generate_token() -> String {
    random_string(TOKEN_LENGTH)
}

#[derive(Clone)]
pub struct TokensService {
    repository: Repository,
    config: AuthConfig,
}

impl TokensService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(self.config.access_token_expire_seconds)
    }

    fn new_pair(&self, user_id: i32, application_id: i32, now: DateTime<Utc>) -> NewTokenPair {
        NewTokenPair {
            user_id,
            application_id,
            access_token: generate_token(),
            refresh_token: generate_token(),
            scope: self.config.scope.clone(),
            expires: self.expiry_from(now),
        }
    }

    fn new_application(&self, user: &User) -> AppResult<NewApplication> {
        Ok(NewApplication {
            user_id: user.id,
            name: Application::name_for(&user.username),
            client_id: random_string(CLIENT_ID_LENGTH),
            client_secret: hash_password(&random_string(CLIENT_SECRET_LENGTH))?,
        })
    }

    /// Create a user with their application and a first token pair
    pub async fn register(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        credentials.check()?;

        if self.repository.users.username_exists(&credentials.username).await? {
            return Err(AppError::UsernameTaken(
                "A user with that username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&credentials.password)?;
        let now = Utc::now();

        let mut tx = self.repository.begin().await?;
        let user = self
            .repository
            .users
            .create(&mut tx, &credentials.username, &password_hash)
            .await?;
        let app = self
            .repository
            .users
            .create_application(&mut tx, &self.new_application(&user)?)
            .await?;
        let pair = self
            .repository
            .tokens
            .create_pair(&mut tx, &self.new_pair(user.id, app.id, now))
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(TokenResponse::from_pair(&pair, now))
    }

    /// Exchange username and password for a token pair, reusing the user's
    /// application and any token that has not expired yet
    pub async fn token(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        let user = self
            .repository
            .users
            .get_by_username(&credentials.username)
            .await?
            .ok_or_else(|| AppError::Credentials("User not found".to_string()))?;

        if !verify_password(&user.password, &credentials.password)? {
            return Err(AppError::Credentials("Wrong credentials".to_string()));
        }

        let now = Utc::now();
        let pair = match self.repository.users.get_application(user.id).await? {
            Some(app) => match self.repository.tokens.find_valid_pair(user.id, app.id, now).await? {
                Some(pair) => {
                    tracing::debug!(user_id = user.id, "Reusing valid access token");
                    pair
                }
                None => self.issue(&app, now).await?,
            },
            None => {
                let mut tx = self.repository.begin().await?;
                let app = self
                    .repository
                    .users
                    .create_application(&mut tx, &self.new_application(&user)?)
                    .await?;
                let pair = self
                    .repository
                    .tokens
                    .create_pair(&mut tx, &self.new_pair(user.id, app.id, now))
                    .await?;
                tx.commit().await?;
                pair
            }
        };

        Ok(TokenResponse::from_pair(&pair, now))
    }

    /// Mint a fresh pair for an application, clearing out expired ones
    async fn issue(&self, app: &Application, now: DateTime<Utc>) -> AppResult<TokenPair> {
        let purged = self
            .repository
            .tokens
            .delete_expired(app.user_id, app.id, now)
            .await?;
        if purged > 0 {
            tracing::debug!(user_id = app.user_id, purged, "Removed expired access tokens");
        }

        let mut tx = self.repository.begin().await?;
        let pair = self
            .repository
            .tokens
            .create_pair(&mut tx, &self.new_pair(app.user_id, app.id, now))
            .await?;
        tx.commit().await?;

        tracing::info!(user_id = app.user_id, "Access token issued");
        Ok(pair)
    }

    /// Give the access token behind a refresh token a new value and expiry
    pub async fn refresh(&self, request: RefreshRequest) -> AppResult<TokenResponse> {
        let invalid = || AppError::InvalidToken("Invalid refresh token".to_string());

        let pair = self
            .repository
            .tokens
            .find_by_refresh_token(&request.refresh_token)
            .await?
            .ok_or_else(invalid)?;

        let now = Utc::now();
        let refreshed = self
            .repository
            .tokens
            .rotate_access_token(pair.access_token_id, &generate_token(), self.expiry_from(now))
            .await?
            .ok_or_else(invalid)?;

        tracing::info!(user_id = refreshed.user_id, "Access token refreshed");
        Ok(TokenResponse::from_pair(&refreshed, now))
    }

    /// Invalidate an access token and its refresh token
    pub async fn revoke(&self, request: RevokeRequest) -> AppResult<()> {
        if !self.repository.tokens.revoke(&request.token).await? {
            return Err(AppError::InvalidToken("Invalid token".to_string()));
        }
        tracing::info!("Access token revoked");
        Ok(())
    }

    /// Resolve a bearer token into the identity it was issued to
    pub async fn authenticate(&self, token: &str) -> AppResult<TokenClaims> {
        let claims = self
            .repository
            .tokens
            .find_claims(token)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid token".to_string()))?;

        if claims.expires <= Utc::now() {
            return Err(AppError::Authentication("Token has expired".to_string()));
        }
        Ok(claims)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("1234abcd").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "1234abcd").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("not-a-hash", "x"),
            Err(AppError::Internal(_))
        ));
    }
}
