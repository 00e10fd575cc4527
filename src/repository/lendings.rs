//! Lendings repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use super::map_constraint_error;
use crate::{
    error::{AppError, AppResult},
    models::lending::{Lending, LendingInput},
};

#[derive(Clone)]
pub struct LendingsRepository {
    pool: Pool<Postgres>,
}

impl LendingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all lendings
    pub async fn list(&self) -> AppResult<Vec<Lending>> {
        let lendings = sqlx::query_as::<_, Lending>("SELECT * FROM lendings ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(lendings)
    }

    /// Get lending by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Lending> {
        sqlx::query_as::<_, Lending>("SELECT * FROM lendings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lending with id {} not found", id)))
    }

    /// Insert a lending inside the caller's transaction
    pub async fn create(&self, conn: &mut PgConnection, lending: &LendingInput) -> AppResult<Lending> {
        let created = sqlx::query_as::<_, Lending>(
            r#"
            INSERT INTO lendings (book_id, customer_id, lending_date, return_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(lending.book_id)
        .bind(lending.customer_id)
        .bind(lending.lending_date)
        .bind(lending.return_date())
        .fetch_one(conn)
        .await
        .map_err(map_constraint_error)?;
        Ok(created)
    }

    /// Persist every field of a lending inside the caller's transaction
    pub async fn update(&self, conn: &mut PgConnection, lending: &Lending) -> AppResult<Lending> {
        sqlx::query_as::<_, Lending>(
            r#"
            UPDATE lendings
            SET book_id = $1, customer_id = $2, lending_date = $3, return_date = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(lending.book_id)
        .bind(lending.customer_id)
        .bind(lending.lending_date)
        .bind(lending.return_date)
        .bind(lending.id)
        .fetch_optional(conn)
        .await
        .map_err(map_constraint_error)?
        .ok_or_else(|| AppError::NotFound(format!("Lending with id {} not found", lending.id)))
    }

    /// Fetch a lending and hold its row lock until the transaction ends
    pub async fn lock(&self, conn: &mut PgConnection, id: i32) -> AppResult<Lending> {
        sqlx::query_as::<_, Lending>("SELECT * FROM lendings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lending with id {} not found", id)))
    }

    /// Delete a lending
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM lendings WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lending with id {} not found", id)));
        }
        Ok(())
    }
}
