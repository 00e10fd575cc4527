//! Author management service

use validator::Validate;

use crate::{
    error::{AppResult, LendingViolation},
    models::author::{Author, AuthorInput, AuthorPatch},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn create(&self, input: AuthorInput) -> AppResult<Author> {
        input.validate()?;
        let author = self.repository.authors.create(&input).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    /// Apply a full or partial update
    pub async fn update(&self, id: i32, patch: AuthorPatch) -> AppResult<Author> {
        patch.validate()?;
        let current = self.repository.authors.get_by_id(id).await?;
        self.repository.authors.update(&patch.apply(current)).await
    }

    /// Delete an author unless one of their books is still lent out
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let author = self.repository.authors.lock_with_books(&mut tx, id).await?;

        if self.repository.authors.has_open_lendings(&mut tx, id).await? {
            tracing::warn!(author_id = id, "Refusing to delete author with books borrowed");
            return Err(LendingViolation::AuthorHasOpenLendings(author.full_name()).into());
        }

        self.repository.authors.delete(&mut tx, id).await?;
        tx.commit().await?;
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }
}
