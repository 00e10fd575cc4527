//! Category model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Create (or fully replace) category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// Partial category update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub name: Option<String>,
}

impl From<CategoryInput> for CategoryPatch {
    fn from(input: CategoryInput) -> Self {
        Self { name: Some(input.name) }
    }
}

impl CategoryPatch {
    pub fn apply(self, mut category: Category) -> Category {
        if let Some(name) = self.name {
            category.name = name;
        }
        category
    }
}
