//! Book management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, LendingViolation},
    models::book::{Book, BookInput, BookPatch},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        input.validate()?;
        self.check_references(input.author_id, input.category_id).await?;
        let book = self.repository.books.create(&input).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    pub async fn update(&self, id: i32, patch: BookPatch) -> AppResult<Book> {
        patch.validate()?;
        let current = self.repository.books.get_by_id(id).await?;
        let updated = patch.apply(current);
        self.check_references(updated.author_id, updated.category_id).await?;
        self.repository.books.update(&updated).await
    }

    /// Delete a book unless it is currently lent out
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let available = self
            .repository
            .books
            .lock_availability(&mut tx, id, None)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if !available {
            tracing::warn!(book_id = id, "Refusing to delete a borrowed book");
            return Err(LendingViolation::BookNotAvailable.into());
        }

        self.repository.books.delete(&mut tx, id).await?;
        tx.commit().await?;
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    async fn check_references(&self, author_id: i32, category_id: i32) -> AppResult<()> {
        if !self.repository.authors.exists(author_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Author with id {} does not exist",
                author_id
            )));
        }
        if !self.repository.categories.exists(category_id).await? {
            return Err(AppError::InvalidReference(format!(
                "Category with id {} does not exist",
                category_id
            )));
        }
        Ok(())
    }
}
