//! Lending (book loan) model and date rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::LendingViolation;

/// Lending model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lending {
    pub id: i32,
    /// Book ID
    #[serde(rename = "book")]
    pub book_id: i32,
    /// Customer ID
    #[serde(rename = "customer")]
    pub customer_id: i32,
    /// Date of lending
    pub lending_date: NaiveDate,
    /// Date of return, null while the book is still out
    pub return_date: Option<NaiveDate>,
}

impl Lending {
    /// A lending stays open until its return date is set
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Create (or fully replace) lending request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LendingInput {
    #[serde(rename = "book")]
    pub book_id: i32,
    #[serde(rename = "customer")]
    pub customer_id: i32,
    pub lending_date: NaiveDate,
    /// Omitted: no return date on create, stored value kept on replace
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub return_date: Option<Option<NaiveDate>>,
}

impl LendingInput {
    /// Return date to store on create
    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date.flatten()
    }
}

/// Partial lending update; `return_date: null` reopens the lending
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LendingPatch {
    #[serde(rename = "book", default, deserialize_with = "super::non_null")]
    pub book_id: Option<i32>,
    #[serde(rename = "customer", default, deserialize_with = "super::non_null")]
    pub customer_id: Option<i32>,
    #[serde(default, deserialize_with = "super::non_null")]
    pub lending_date: Option<NaiveDate>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub return_date: Option<Option<NaiveDate>>,
}

impl From<LendingInput> for LendingPatch {
    fn from(input: LendingInput) -> Self {
        Self {
            book_id: Some(input.book_id),
            customer_id: Some(input.customer_id),
            lending_date: Some(input.lending_date),
            return_date: input.return_date,
        }
    }
}

impl LendingPatch {
    pub fn apply(self, mut lending: Lending) -> Lending {
        if let Some(book_id) = self.book_id {
            lending.book_id = book_id;
        }
        if let Some(customer_id) = self.customer_id {
            lending.customer_id = customer_id;
        }
        if let Some(lending_date) = self.lending_date {
            lending.lending_date = lending_date;
        }
        if let Some(return_date) = self.return_date {
            lending.return_date = return_date;
        }
        lending
    }
}

/// Check that a return date, when present, lies within `[lending_date, today]`
pub fn check_return_date(
    lending_date: NaiveDate,
    return_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), LendingViolation> {
    match return_date {
        Some(returned) if returned > today => Err(LendingViolation::ReturnDateInFuture),
        Some(returned) if returned < lending_date => Err(LendingViolation::ReturnDateBeforeLending),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_open_lending_has_no_return_date() {
        let today = date(2024, 3, 10);
        assert_eq!(check_return_date(date(2024, 3, 1), None, today), Ok(()));
    }

    #[test]
    fn test_return_date_bounds_are_inclusive() {
        let today = date(2024, 3, 10);
        assert_eq!(check_return_date(date(2024, 3, 1), Some(date(2024, 3, 1)), today), Ok(()));
        assert_eq!(check_return_date(date(2024, 3, 1), Some(today), today), Ok(()));
    }

    #[test]
    fn test_return_date_in_future() {
        let today = date(2024, 3, 10);
        assert_eq!(
            check_return_date(date(2024, 3, 1), Some(date(2024, 3, 11)), today),
            Err(LendingViolation::ReturnDateInFuture)
        );
    }

    #[test]
    fn test_return_date_before_lending() {
        let today = date(2024, 3, 10);
        assert_eq!(
            check_return_date(date(2024, 3, 5), Some(date(2024, 3, 4)), today),
            Err(LendingViolation::ReturnDateBeforeLending)
        );
    }

    #[test]
    fn test_patch_reopens_lending() {
        let lending = Lending {
            id: 1,
            book_id: 2,
            customer_id: 3,
            lending_date: date(2024, 1, 1),
            return_date: Some(date(2024, 1, 15)),
        };
        let patch: LendingPatch = serde_json::from_str(r#"{"return_date": null}"#).unwrap();
        assert!(patch.apply(lending).is_open());
    }

    #[test]
    fn test_input_return_date_is_optional() {
        let input: LendingInput = serde_json::from_str(
            r#"{"book": 1, "customer": 2, "lending_date": "2024-01-01"}"#,
        )
        .unwrap();
        assert!(input.return_date().is_none());
    }

    #[test]
    fn test_replace_without_return_date_keeps_it() {
        let returned = Lending {
            id: 1,
            book_id: 2,
            customer_id: 3,
            lending_date: date(2024, 1, 1),
            return_date: Some(date(2024, 2, 1)),
        };
        let input: LendingInput = serde_json::from_str(
            r#"{"book": 2, "customer": 3, "lending_date": "2024-01-01"}"#,
        )
        .unwrap();
        let kept = LendingPatch::from(input).apply(returned.clone());
        assert_eq!(kept.return_date, Some(date(2024, 2, 1)));

        let input: LendingInput = serde_json::from_str(
            r#"{"book": 2, "customer": 3, "lending_date": "2024-01-01", "return_date": null}"#,
        )
        .unwrap();
        assert!(LendingPatch::from(input).apply(returned).is_open());
    }

    #[test]
    fn test_patch_rejects_null_lending_date() {
        let result = serde_json::from_str::<LendingPatch>(r#"{"lending_date": null}"#);
        assert!(result.unwrap_err().to_string().contains("may not be null"));

        let patch: LendingPatch = serde_json::from_str(r#"{"book": 7}"#).unwrap();
        assert_eq!(patch.book_id, Some(7));
        assert!(patch.lending_date.is_none());
    }
}
