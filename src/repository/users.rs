//! Users and per-user applications repository

use sqlx::{PgConnection, Pool, Postgres};

use super::map_constraint_error;
use crate::{
    error::AppResult,
    models::user::{Application, NewApplication, User, CLIENT_CONFIDENTIAL, GRANT_PASSWORD},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check if username already exists
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a user inside the caller's transaction
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        username: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING *",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(conn)
        .await
        .map_err(map_constraint_error)?;
        Ok(user)
    }

    /// First application registered for a user
    pub async fn get_application(&self, user_id: i32) -> AppResult<Option<Application>> {
        let app = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(app)
    }

    /// Register a confidential, password-grant application
    pub async fn create_application(
        &self,
        conn: &mut PgConnection,
        app: &NewApplication,
    ) -> AppResult<Application> {
        let created = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (
                user_id, name, client_id, client_secret, client_type, authorization_grant_type
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(app.user_id)
        .bind(&app.name)
        .bind(&app.client_id)
        .bind(&app.client_secret)
        .bind(CLIENT_CONFIDENTIAL)
        .bind(GRANT_PASSWORD)
        .fetch_one(conn)
        .await?;
        Ok(created)
    }
}
