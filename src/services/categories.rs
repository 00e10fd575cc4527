//! Category management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::category::{Category, CategoryInput, CategoryPatch},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create(&self, input: CategoryInput) -> AppResult<Category> {
        input.validate()?;
        let category = self.repository.categories.create(&input).await?;
        tracing::info!(category_id = category.id, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: i32, patch: CategoryPatch) -> AppResult<Category> {
        patch.validate()?;
        let current = self.repository.categories.get_by_id(id).await?;
        self.repository.categories.update(&patch.apply(current)).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await?;
        tracing::info!(category_id = id, "Category deleted");
        Ok(())
    }
}
