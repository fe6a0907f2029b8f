use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SocialLink {
    pub id: String,
    pub name: String,
    pub url: String,
    pub icon: String,
    pub order_index: Option<i32>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct SocialLinkCreate {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub order_index: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SocialLinkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i32>>,
}

impl Record for SocialLink {
    const COLLECTION: &'static str = "social_links";
    const LABEL: &'static str = "Social link";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "order_index": 1 })
    }
}

impl Editable for SocialLink {
    type Create = SocialLinkCreate;
    type Patch = SocialLinkUpdate;

    fn from_create(input: SocialLinkCreate) -> Self {
        let now = Utc::now();
        SocialLink {
            id: new_id(),
            name: input.name,
            url: input.url,
            icon: input.icon,
            order_index: input.order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for SocialLinkCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("url", &self.url)
    }
}

impl Validate for SocialLinkUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("name", self.name.as_ref())?;
        require_if_set("url", self.url.as_ref())
    }
}
