//! Data models for the library manager

pub mod author;
pub mod book;
pub mod category;
pub mod customer;
pub mod lending;
pub mod user;

use serde::{de, Deserialize, Deserializer};

// Re-export commonly used types
pub use author::Author;
pub use book::Book;
pub use category::Category;
pub use customer::Customer;
pub use lending::Lending;
pub use user::{TokenClaims, TokenResponse, User};

/// Patch field that may be omitted but not set to `null`.
///
/// Pair with `#[serde(default)]` so a missing field stays `None`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<T>::deserialize(deserializer)? {
        Some(value) => Ok(Some(value)),
        None => Err(de::Error::custom("This field may not be null")),
    }
}
