//! Business logic services

pub mod authors;
pub mod books;
pub mod categories;
pub mod customers;
pub mod lendings;
pub mod tokens;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub categories: categories::CategoriesService,
    pub books: books::BooksService,
    pub customers: customers::CustomersService,
    pub lendings: lendings::LendingsService,
    pub tokens: tokens::TokensService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            categories: categories::CategoriesService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            customers: customers::CustomersService::new(repository.clone()),
            lendings: lendings::LendingsService::new(repository.clone()),
            tokens: tokens::TokensService::new(repository.clone(), auth_config),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
