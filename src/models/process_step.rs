use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_range, new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcessStep {
    pub id: String,
    pub step: i32,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct ProcessStepCreate {
    pub step: i32,
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ProcessStepUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Record for ProcessStep {
    const COLLECTION: &'static str = "process_steps";
    const LABEL: &'static str = "Process step";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "step": 1 })
    }
}

impl Editable for ProcessStep {
    type Create = ProcessStepCreate;
    type Patch = ProcessStepUpdate;

    fn from_create(input: ProcessStepCreate) -> Self {
        let now = Utc::now();
        ProcessStep {
            id: new_id(),
            step: input.step,
            title: input.title,
            description: input.description,
            icon: input.icon,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for ProcessStepCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        check_range("step", i64::from(self.step), 1, i64::from(i32::MAX))?;
        require("title", &self.title)
    }
}

impl Validate for ProcessStepUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(step) = self.step {
            check_range("step", i64::from(step), 1, i64::from(i32::MAX))?;
        }
        require_if_set("title", self.title.as_ref())
    }
}
