use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

/// Status value counted as finished by the analytics dashboard.
pub const COMPLETED_STATUS: &str = "Terminé";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: String,
    pub duration: String,
    pub github: Option<String>,
    pub demo: Option<String>,
    pub order_index: Option<i32>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct ProjectCreate {
    pub title: String,
    pub category: String,
    pub level: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub status: String,
    pub duration: String,
    pub github: Option<String>,
    pub demo: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub github: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub demo: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i32>>,
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "order_index": 1 })
    }
}

impl Editable for Project {
    type Create = ProjectCreate;
    type Patch = ProjectUpdate;

    fn from_create(input: ProjectCreate) -> Self {
        let now = Utc::now();
        Project {
            id: new_id(),
            title: input.title,
            category: input.category,
            level: input.level,
            description: input.description,
            technologies: input.technologies,
            features: input.features,
            status: input.status,
            duration: input.duration,
            github: input.github,
            demo: input.demo,
            order_index: input.order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for ProjectCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("status", &self.status)
    }
}

impl Validate for ProjectUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("title", self.title.as_ref())?;
        require_if_set("status", self.status.as_ref())
    }
}
