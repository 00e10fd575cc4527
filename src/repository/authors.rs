//! Authors repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorInput},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all authors
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a new author
    pub async fn create(&self, author: &AuthorInput) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, surname, birth_date, death_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.name)
        .bind(&author.surname)
        .bind(author.birth_date)
        .bind(author.death_date())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist every field of an author
    pub async fn update(&self, author: &Author) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET name = $1, surname = $2, birth_date = $3, death_date = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&author.name)
        .bind(&author.surname)
        .bind(author.birth_date)
        .bind(author.death_date)
        .bind(author.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", author.id)))
    }

    /// Lock an author row together with all of their book rows, so no book
    /// can be added or lent out until the transaction ends
    pub async fn lock_with_books(&self, conn: &mut PgConnection, id: i32) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        sqlx::query("SELECT id FROM books WHERE author_id = $1 ORDER BY id FOR UPDATE")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(author)
    }

    /// Whether any book by this author is currently lent out
    pub async fn has_open_lendings(&self, conn: &mut PgConnection, id: i32) -> AppResult<bool> {
        let borrowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM lendings l
                JOIN books b ON l.book_id = b.id
                WHERE b.author_id = $1 AND l.return_date IS NULL
            )
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await?;
        Ok(borrowed)
    }

    /// Delete an author (cascades to their books and lendings)
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }
}
