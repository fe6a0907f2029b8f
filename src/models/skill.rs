use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_range, new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SkillItem {
    pub name: String,
    /// Proficiency, 0 to 100.
    pub level: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SkillCategory {
    pub id: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub items: Vec<SkillItem>,
    /// Stable key such as `cybersecurity` or `python`.
    pub category_key: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct SkillCategoryCreate {
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub items: Vec<SkillItem>,
    pub category_key: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SkillCategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SkillItem>>,
}

impl Record for SkillCategory {
    const COLLECTION: &'static str = "skill_categories";
    const LABEL: &'static str = "Skill category";
    const LOOKUP_FIELD: &'static str = "category_key";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for SkillCategory {
    type Create = SkillCategoryCreate;
    type Patch = SkillCategoryUpdate;

    fn from_create(input: SkillCategoryCreate) -> Self {
        let now = Utc::now();
        SkillCategory {
            id: new_id(),
            title: input.title,
            icon: input.icon,
            items: input.items,
            category_key: input.category_key,
            created_at: now,
            updated_at: now,
        }
    }

    fn conflict(input: &SkillCategoryCreate) -> Option<(Document, &'static str)> {
        Some((
            doc! { "category_key": input.category_key.as_str() },
            "Skill category with this key already exists",
        ))
    }
}

fn validate_items(items: &[SkillItem]) -> Result<(), ValidationError> {
    for item in items {
        require("skill name", &item.name)?;
        check_range("skill level", i64::from(item.level), 0, 100)?;
    }
    Ok(())
}

impl Validate for SkillCategoryCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category_key", &self.category_key)?;
        validate_items(&self.items)
    }
}

impl Validate for SkillCategoryUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("title", self.title.as_ref())?;
        self.items.as_deref().map_or(Ok(()), validate_items)
    }
}
