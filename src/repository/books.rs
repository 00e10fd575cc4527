//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use super::map_constraint_error;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput},
};

/// Book columns plus the derived availability flag
const BOOK_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id, b.category_id, b.published_date,
           NOT EXISTS (
               SELECT 1 FROM lendings l
               WHERE l.book_id = b.id AND l.return_date IS NULL
           ) AS available
    FROM books b
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all books with their availability
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!("{} ORDER BY b.id", BOOK_SELECT);
        let books = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("{} WHERE b.id = $1", BOOK_SELECT);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Create a new book
    pub async fn create(&self, book: &BookInput) -> AppResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author_id, category_id, published_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.category_id)
        .bind(book.published_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        self.get_by_id(id).await
    }

    /// Persist every stored field of a book
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, category_id = $3, published_date = $4
            WHERE id = $5
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.category_id)
        .bind(book.published_date)
        .bind(book.id)
        .execute(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", book.id)));
        }
        self.get_by_id(book.id).await
    }

    /// Lock a book row for the rest of the transaction and report whether it
    /// has no open lending other than `exclude_lending`.
    ///
    /// Returns `None` when the book does not exist.
    pub async fn lock_availability(
        &self,
        conn: &mut PgConnection,
        id: i32,
        exclude_lending: Option<i32>,
    ) -> AppResult<Option<bool>> {
        let available: Option<bool> = sqlx::query_scalar(
            r#"
            SELECT NOT EXISTS (
                SELECT 1 FROM lendings l
                WHERE l.book_id = b.id
                  AND l.return_date IS NULL
                  AND ($2::INTEGER IS NULL OR l.id <> $2)
            )
            FROM books b
            WHERE b.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(id)
        .bind(exclude_lending)
        .fetch_optional(conn)
        .await?;
        Ok(available)
    }

    /// Delete a book (cascades to its lendings)
    pub async fn delete(&self, conn: &mut PgConnection, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
