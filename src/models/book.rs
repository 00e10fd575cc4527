//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book with its derived availability
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Author ID
    #[serde(rename = "author")]
    pub author_id: i32,
    /// Category ID
    #[serde(rename = "category")]
    pub category_id: i32,
    /// Date of publication
    pub published_date: NaiveDate,
    /// True when no lending of this book is still open
    pub available: bool,
}

/// Create (or fully replace) book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,
    #[serde(rename = "author")]
    pub author_id: i32,
    #[serde(rename = "category")]
    pub category_id: i32,
    pub published_date: NaiveDate,
}

/// Partial book update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct BookPatch {
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub title: Option<String>,
    #[serde(rename = "author", default, deserialize_with = "super::non_null")]
    pub author_id: Option<i32>,
    #[serde(rename = "category", default, deserialize_with = "super::non_null")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub published_date: Option<NaiveDate>,
}

impl From<BookInput> for BookPatch {
    fn from(input: BookInput) -> Self {
        Self {
            title: Some(input.title),
            author_id: Some(input.author_id),
            category_id: Some(input.category_id),
            published_date: Some(input.published_date),
        }
    }
}

impl BookPatch {
    pub fn apply(self, mut book: Book) -> Book {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        if let Some(category_id) = self.category_id {
            book.category_id = category_id;
        }
        if let Some(published_date) = self.published_date {
            book.published_date = published_date;
        }
        book
    }
}
