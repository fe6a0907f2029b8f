use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

/// A hand-maintained figure shown on the portfolio ("10+ years", "50 clients").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Statistic {
    pub id: String,
    pub label: String,
    pub value: String,
    pub icon: String,
    pub order_index: Option<i32>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct StatisticCreate {
    pub label: String,
    pub value: String,
    pub icon: String,
    pub order_index: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct StatisticUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i32>>,
}

impl Record for Statistic {
    const COLLECTION: &'static str = "statistics";
    const LABEL: &'static str = "Statistic";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "order_index": 1 })
    }
}

impl Editable for Statistic {
    type Create = StatisticCreate;
    type Patch = StatisticUpdate;

    fn from_create(input: StatisticCreate) -> Self {
        let now = Utc::now();
        Statistic {
            id: new_id(),
            label: input.label,
            value: input.value,
            icon: input.icon,
            order_index: input.order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for StatisticCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("label", &self.label)?;
        require("value", &self.value)
    }
}

impl Validate for StatisticUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("label", self.label.as_ref())?;
        require_if_set("value", self.value.as_ref())
    }
}
