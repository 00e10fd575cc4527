//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub surname: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    pub death_date: Option<NaiveDate>,
}

impl Author {
    /// An author is alive while no death date is recorded
    pub fn is_alive(&self) -> bool {
        self.death_date.is_none()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Create (or fully replace) author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Surname must be 1-50 characters"))]
    pub surname: String,
    pub birth_date: NaiveDate,
    /// Omitted: no death date on create, stored value kept on replace
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub death_date: Option<Option<NaiveDate>>,
}

impl AuthorInput {
    /// Death date to store on create
    pub fn death_date(&self) -> Option<NaiveDate> {
        self.death_date.flatten()
    }
}

/// Partial author update; `death_date: null` clears the date
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorPatch {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Surname must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub death_date: Option<Option<NaiveDate>>,
}

impl From<AuthorInput> for AuthorPatch {
    fn from(input: AuthorInput) -> Self {
        Self {
            name: Some(input.name),
            surname: Some(input.surname),
            birth_date: Some(input.birth_date),
            death_date: input.death_date,
        }
    }
}

impl AuthorPatch {
    /// Apply the supplied fields on top of an existing author
    pub fn apply(self, mut author: Author) -> Author {
        if let Some(name) = self.name {
            author.name = name;
        }
        if let Some(surname) = self.surname {
            author.surname = surname;
        }
        if let Some(birth_date) = self.birth_date {
            author.birth_date = birth_date;
        }
        if let Some(death_date) = self.death_date {
            author.death_date = death_date;
        }
        author
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(death_date: Option<NaiveDate>) -> Author {
        Author {
            id: 1,
            name: "Author 1".to_string(),
            surname: "Surname 1".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            death_date,
        }
    }

    #[test]
    fn test_author_is_alive() {
        assert!(!author(NaiveDate::from_ymd_opt(2023, 1, 2)).is_alive());
        assert!(author(None).is_alive());
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let died = NaiveDate::from_ymd_opt(2023, 1, 2);

        let untouched: AuthorPatch = serde_json::from_str(r#"{"name": "Other"}"#).unwrap();
        let updated = untouched.apply(author(died));
        assert_eq!(updated.name, "Other");
        assert_eq!(updated.death_date, died);

        let cleared: AuthorPatch = serde_json::from_str(r#"{"death_date": null}"#).unwrap();
        assert!(cleared.apply(author(died)).is_alive());
    }

    #[test]
    fn test_input_length_limits() {
        let input = AuthorInput {
            name: "x".repeat(51),
            surname: "Surname".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1900, 1, 1).unwrap(),
            death_date: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_replace_keeps_death_date_unless_nulled() {
        let died = NaiveDate::from_ymd_opt(2023, 1, 2);

        let input: AuthorInput = serde_json::from_str(
            r#"{"name": "A", "surname": "B", "birth_date": "1950-01-01"}"#,
        )
        .unwrap();
        assert_eq!(input.death_date(), None);
        assert_eq!(AuthorPatch::from(input).apply(author(died)).death_date, died);

        let input: AuthorInput = serde_json::from_str(
            r#"{"name": "A", "surname": "B", "birth_date": "1950-01-01", "death_date": null}"#,
        )
        .unwrap();
        assert!(AuthorPatch::from(input).apply(author(died)).is_alive());
    }

    #[test]
    fn test_patch_rejects_null_name() {
        assert!(serde_json::from_str::<AuthorPatch>(r#"{"name": null}"#).is_err());
        assert!(serde_json::from_str::<AuthorPatch>(r#"{"birth_date": null}"#).is_err());
    }
}
