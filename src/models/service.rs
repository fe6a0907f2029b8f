use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: String,
    pub duration: String,
    pub order_index: Option<i32>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct ServiceCreate {
    pub title: String,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub price: String,
    pub duration: String,
    pub order_index: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i32>>,
}

impl Record for Service {
    const COLLECTION: &'static str = "services";
    const LABEL: &'static str = "Service";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "order_index": 1 })
    }
}

impl Editable for Service {
    type Create = ServiceCreate;
    type Patch = ServiceUpdate;

    fn from_create(input: ServiceCreate) -> Self {
        let now = Utc::now();
        Service {
            id: new_id(),
            title: input.title,
            icon: input.icon,
            description: input.description,
            features: input.features,
            price: input.price,
            duration: input.duration,
            order_index: input.order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for ServiceCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)
    }
}

impl Validate for ServiceUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("title", self.title.as_ref())
    }
}
