use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Technology {
    pub id: String,
    pub name: String,
    pub category: String,
    pub icon: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct TechnologyCreate {
    pub name: String,
    pub category: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TechnologyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Record for Technology {
    const COLLECTION: &'static str = "technologies";
    const LABEL: &'static str = "Technology";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "name": 1 })
    }
}

impl Editable for Technology {
    type Create = TechnologyCreate;
    type Patch = TechnologyUpdate;

    fn from_create(input: TechnologyCreate) -> Self {
        let now = Utc::now();
        Technology {
            id: new_id(),
            name: input.name,
            category: input.category,
            icon: input.icon,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for TechnologyCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("category", &self.category)
    }
}

impl Validate for TechnologyUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("name", self.name.as_ref())
    }
}
