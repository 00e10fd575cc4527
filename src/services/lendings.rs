//! Lending management service

use chrono::{Local, NaiveDate};

use crate::{
    error::{AppError, AppResult, LendingViolation},
    models::lending::{check_return_date, Lending, LendingInput, LendingPatch},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingsService {
    repository: Repository,
}

/// Server-local calendar date
fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl LendingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Lending>> {
        self.repository.lendings.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Lending> {
        self.repository.lendings.get_by_id(id).await
    }

    /// Lend a book, or record a lending that is already closed
    pub async fn create(&self, input: LendingInput) -> AppResult<Lending> {
        check_return_date(input.lending_date, input.return_date(), today())?;
        self.check_customer(input.customer_id).await?;

        let mut tx = self.repository.begin().await?;

        let available = self
            .repository
            .books
            .lock_availability(&mut tx, input.book_id, None)
            .await?
            .ok_or_else(|| missing_book(input.book_id))?;

        if input.return_date().is_none() && !available {
            tracing::warn!(book_id = input.book_id, "Book is already lent out");
            return Err(LendingViolation::BookNotAvailable.into());
        }

        let lending = self.repository.lendings.create(&mut tx, &input).await?;
        tx.commit().await?;

        tracing::info!(lending_id = lending.id, book_id = lending.book_id, "Lending created");
        Ok(lending)
    }

    /// Apply a full or partial update, re-checking the date rules and the
    /// book's availability on the resulting record
    pub async fn update(&self, id: i32, patch: LendingPatch) -> AppResult<Lending> {
        let current = self.repository.lendings.get_by_id(id).await?;
        let updated = patch.apply(current.clone());

        check_return_date(updated.lending_date, updated.return_date, today())?;
        if updated.customer_id != current.customer_id {
            self.check_customer(updated.customer_id).await?;
        }

        let mut tx = self.repository.begin().await?;

        let available = self
            .repository
            .books
            .lock_availability(&mut tx, updated.book_id, Some(id))
            .await?
            .ok_or_else(|| missing_book(updated.book_id))?;

        if updated.is_open() && !available {
            tracing::warn!(lending_id = id, book_id = updated.book_id, "Book is already lent out");
            return Err(LendingViolation::BookNotAvailable.into());
        }

        let lending = self.repository.lendings.update(&mut tx, &updated).await?;
        tx.commit().await?;

        if current.is_open() && !lending.is_open() {
            tracing::info!(lending_id = id, "Book returned");
        }
        Ok(lending)
    }

    /// Delete a lending once the book is back
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.repository.begin().await?;
        let lending = self.repository.lendings.lock(&mut tx, id).await?;

        if lending.is_open() {
            tracing::warn!(lending_id = id, "Refusing to delete an open lending");
            return Err(LendingViolation::NotReturned.into());
        }

        self.repository.lendings.delete(&mut tx, id).await?;
        tx.commit().await?;
        tracing::info!(lending_id = id, "Lending deleted");
        Ok(())
    }

    async fn check_customer(&self, customer_id: i32) -> AppResult<()> {
        if self.repository.customers.exists(customer_id).await? {
            Ok(())
        } else {
            Err(AppError::InvalidReference(format!(
                "Customer with id {} does not exist",
                customer_id
            )))
        }
    }
}

fn missing_book(book_id: i32) -> AppError {
    AppError::InvalidReference(format!("Book with id {} does not exist", book_id))
}
