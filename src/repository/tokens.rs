//! Access and refresh token storage

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::user::{NewTokenPair, TokenClaims, TokenPair},
};

const PAIR_COLUMNS: &str = r#"
    a.id AS access_token_id, a.user_id, a.application_id,
    a.token AS access_token, r.token AS refresh_token, a.scope, a.expires
"#;

#[derive(Clone)]
pub struct TokensRepository {
    pool: Pool<Postgres>,
}

impl TokensRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Latest non-expired token pair held by a user for an application
    pub async fn find_valid_pair(
        &self,
        user_id: i32,
        application_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TokenPair>> {
        let query = format!(
            r#"
            SELECT {}
            FROM access_tokens a
            JOIN refresh_tokens r ON r.access_token_id = a.id
            WHERE a.user_id = $1 AND a.application_id = $2 AND a.expires > $3
            ORDER BY a.expires DESC
            LIMIT 1
            "#,
            PAIR_COLUMNS
        );
        let pair = sqlx::query_as::<_, TokenPair>(&query)
            .bind(user_id)
            .bind(application_id)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pair)
    }

    /// Token pair owning the given refresh token
    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> AppResult<Option<TokenPair>> {
        let query = format!(
            r#"
            SELECT {}
            FROM refresh_tokens r
            JOIN access_tokens a ON r.access_token_id = a.id
            WHERE r.token = $1
            "#,
            PAIR_COLUMNS
        );
        let pair = sqlx::query_as::<_, TokenPair>(&query)
            .bind(refresh_token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pair)
    }

    /// Store an access token and its refresh token inside the caller's transaction
    pub async fn create_pair(&self, conn: &mut PgConnection, pair: &NewTokenPair) -> AppResult<TokenPair> {
        let access_token_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO access_tokens (user_id, application_id, token, scope, expires)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(pair.user_id)
        .bind(pair.application_id)
        .bind(&pair.access_token)
        .bind(&pair.scope)
        .bind(pair.expires)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, application_id, access_token_id, token)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(pair.user_id)
        .bind(pair.application_id)
        .bind(access_token_id)
        .bind(&pair.refresh_token)
        .execute(&mut *conn)
        .await?;

        Ok(TokenPair {
            access_token_id,
            user_id: pair.user_id,
            application_id: pair.application_id,
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            scope: pair.scope.clone(),
            expires: pair.expires,
        })
    }

    /// Give an access token a new value and expiry, keeping its refresh token
    pub async fn rotate_access_token(
        &self,
        access_token_id: i32,
        token: &str,
        expires: DateTime<Utc>,
    ) -> AppResult<Option<TokenPair>> {
        let query = format!(
            r#"
            WITH a AS (
                UPDATE access_tokens SET token = $1, expires = $2
                WHERE id = $3
                RETURNING *
            )
            SELECT {}
            FROM a
            JOIN refresh_tokens r ON r.access_token_id = a.id
            "#,
            PAIR_COLUMNS
        );
        let pair = sqlx::query_as::<_, TokenPair>(&query)
            .bind(token)
            .bind(expires)
            .bind(access_token_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pair)
    }

    /// Drop a user's expired tokens for an application
    pub async fn delete_expired(
        &self,
        user_id: i32,
        application_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM access_tokens WHERE user_id = $1 AND application_id = $2 AND expires <= $3",
        )
        .bind(user_id)
        .bind(application_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Identity behind an access token, whether or not it has expired
    pub async fn find_claims(&self, token: &str) -> AppResult<Option<TokenClaims>> {
        let claims = sqlx::query_as::<_, TokenClaims>(
            r#"
            SELECT a.user_id, a.scope, a.expires
            FROM access_tokens a
            WHERE a.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(claims)
    }

    /// Delete an access token; its refresh token goes with it.
    /// Returns false when no such token exists.
    pub async fn revoke(&self, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
