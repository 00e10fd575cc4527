//! Customer model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Library customer (borrower)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub address: String,
    pub phone_number: String,
    pub email: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Create (or fully replace) customer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Surname must be 1-50 characters"))]
    pub surname: String,
    #[validate(length(min = 1, max = 120, message = "Address must be 1-120 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 50, message = "Phone number must be 1-50 characters"))]
    pub phone_number: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
}

/// Partial customer update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CustomerPatch {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Surname must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Address must be 1-120 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Phone number must be 1-50 characters"))]
    #[serde(default, deserialize_with = "super::non_null")]
    pub phone_number: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    #[serde(default, deserialize_with = "super::non_null")]
    pub email: Option<String>,
}

impl From<CustomerInput> for CustomerPatch {
    fn from(input: CustomerInput) -> Self {
        Self {
            name: Some(input.name),
            surname: Some(input.surname),
            address: Some(input.address),
            phone_number: Some(input.phone_number),
            email: Some(input.email),
        }
    }
}

impl CustomerPatch {
    pub fn apply(self, mut customer: Customer) -> Customer {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(surname) = self.surname {
            customer.surname = surname;
        }
        if let Some(address) = self.address {
            customer.address = address;
        }
        if let Some(phone_number) = self.phone_number {
            customer.phone_number = phone_number;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        customer
    }
}
