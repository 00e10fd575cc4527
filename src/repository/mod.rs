//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod categories;
pub mod customers;
pub mod lendings;
pub mod tokens;
pub mod users;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult, LendingViolation};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub categories: categories::CategoriesRepository,
    pub books: books::BooksRepository,
    pub customers: customers::CustomersRepository,
    pub lendings: lendings::LendingsRepository,
    pub users: users::UsersRepository,
    pub tokens: tokens::TokensRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            lendings: lendings::LendingsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            tokens: tokens::TokensRepository::new(pool.clone()),
            pool,
        }
    }

    /// Start a transaction on the shared pool
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Translate constraint violations raised by PostgreSQL into domain errors
pub(crate) fn map_constraint_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        let constraint = db_err.constraint().unwrap_or_default();
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) if constraint == "idx_lendings_open_book" => {
                return LendingViolation::BookNotAvailable.into();
            }
            Some(UNIQUE_VIOLATION) if constraint == "users_username_key" => {
                return AppError::UsernameTaken("A user with that username already exists".to_string());
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::InvalidReference(format!(
                    "Referenced record does not exist ({})",
                    constraint
                ));
            }
            _ => {}
        }
    }
    AppError::Database(err)
}
