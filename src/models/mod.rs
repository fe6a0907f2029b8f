pub mod admin;
pub mod blog;
pub mod booking;
pub mod newsletter;
pub mod personal;
pub mod process_step;
pub mod project;
pub mod quote;
pub mod resource;
pub mod service;
pub mod skill;
pub mod social_link;
pub mod statistic;
pub mod technology;
pub mod testimonial;
pub mod timestamp;

use mongodb::bson::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::repository::Record;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Rejected input, rendered as a 400 with this message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A record administrators manage through the standard create / update
/// endpoints.
pub trait Editable: Record {
    type Create: DeserializeOwned + Validate + Send;
    /// Partial update; fields left `None` are not serialized and so stay
    /// untouched in the store. Nullable fields are `Option<Option<_>>` and an
    /// explicit `null` clears them.
    type Patch: Serialize + Validate + Send;

    fn from_create(input: Self::Create) -> Self;

    /// Filter and message of the uniqueness rule a new record must satisfy.
    fn conflict(_input: &Self::Create) -> Option<(Document, &'static str)> {
        None
    }

    /// Same as [`conflict`](Editable::conflict) for a patch applied to `self`;
    /// the filter must exclude `self`.
    fn conflict_on_update(&self, _patch: &Self::Patch) -> Option<(Document, &'static str)> {
        None
    }

    /// Hook to derive extra `$set` fields from the stored record.
    fn prepare_update(&self, _fields: &mut Document) {}
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_if_set(field: &str, value: Option<&String>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require(field, v))
}

pub(crate) fn check_email(field: &str, value: &str) -> Result<(), ValidationError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError(format!("{field} is not a valid email address")));
    }
    Ok(())
}

pub(crate) fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError(format!("{field} must be between {min} and {max}")));
    }
    Ok(())
}
