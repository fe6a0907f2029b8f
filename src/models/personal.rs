use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{check_email, new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersonalInfo {
    pub id: String,
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub website: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct PersonalInfoCreate {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub bio: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
    pub website: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PersonalInfoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub availability: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub website: Option<Option<String>>,
}

impl Record for PersonalInfo {
    const COLLECTION: &'static str = "personal_info";
    const LABEL: &'static str = "Personal information";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for PersonalInfo {
    type Create = PersonalInfoCreate;
    type Patch = PersonalInfoUpdate;

    fn from_create(input: PersonalInfoCreate) -> Self {
        let now = Utc::now();
        PersonalInfo {
            id: new_id(),
            name: input.name,
            title: input.title,
            subtitle: input.subtitle,
            bio: input.bio,
            email: input.email,
            phone: input.phone,
            location: input.location,
            availability: input.availability,
            website: input.website,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for PersonalInfoCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("title", &self.title)?;
        check_email("email", &self.email)
    }
}

impl Validate for PersonalInfoUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("name", self.name.as_ref())?;
        require_if_set("title", self.title.as_ref())?;
        match &self.email {
            Some(email) => check_email("email", email),
            None => Ok(()),
        }
    }
}
