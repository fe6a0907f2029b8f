use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

/// A downloadable guide, checklist or template offered to visitors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub pages: Option<i32>,
    #[serde(default)]
    pub downloads: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: String,
    pub file_path: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct ResourceCreate {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub pages: Option<i32>,
    #[serde(default)]
    pub downloads: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: String,
    pub file_path: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ResourceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub pages: Option<Option<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub file_path: Option<Option<String>>,
}

impl Record for Resource {
    const COLLECTION: &'static str = "resources";
    const LABEL: &'static str = "Resource";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "created_at": -1 })
    }
}

impl Editable for Resource {
    type Create = ResourceCreate;
    type Patch = ResourceUpdate;

    fn from_create(input: ResourceCreate) -> Self {
        let now = Utc::now();
        Resource {
            id: new_id(),
            title: input.title,
            description: input.description,
            category: input.category,
            kind: input.kind,
            size: input.size,
            pages: input.pages,
            downloads: input.downloads,
            rating: input.rating,
            featured: input.featured,
            tags: input.tags,
            difficulty: input.difficulty,
            file_path: input.file_path,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for ResourceCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("type", &self.kind)?;
        if self.downloads < 0 {
            return Err(ValidationError("downloads must not be negative".to_string()));
        }
        check_rating(self.rating)
    }
}

impl Validate for ResourceUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("title", self.title.as_ref())?;
        require_if_set("type", self.kind.as_ref())?;
        self.rating.map_or(Ok(()), check_rating)
    }
}

fn check_rating(rating: f64) -> Result<(), ValidationError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(ValidationError("rating must be between 0 and 5".to_string()));
    }
    Ok(())
}

/// One recorded download of a resource.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceDownload {
    pub id: String,
    pub resource_id: String,
    pub user_email: Option<String>,
    pub ip_address: Option<String>,
    #[serde(with = "timestamp")]
    pub downloaded_at: DateTime<Utc>,
}

impl ResourceDownload {
    pub fn new(resource_id: &str, user_email: Option<String>, ip_address: Option<String>) -> Self {
        ResourceDownload {
            id: new_id(),
            resource_id: resource_id.to_string(),
            user_email,
            ip_address,
            downloaded_at: Utc::now(),
        }
    }
}

impl Record for ResourceDownload {
    const COLLECTION: &'static str = "resource_downloads";
    const LABEL: &'static str = "Resource download";

    fn id(&self) -> &str {
        &self.id
    }
}

#[allow(clippy::too_many_arguments)]
fn seed(
    title: &str,
    description: &str,
    category: &str,
    kind: &str,
    size: &str,
    pages: Option<i32>,
    downloads: i64,
    rating: f64,
    featured: bool,
    tags: &[&str],
    difficulty: &str,
) -> ResourceCreate {
    ResourceCreate {
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        kind: kind.to_string(),
        size: size.to_string(),
        pages,
        downloads,
        rating,
        featured,
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        difficulty: difficulty.to_string(),
        file_path: None,
    }
}

/// The starter catalog installed by the resources init endpoint.
pub fn default_resources() -> Vec<Resource> {
    vec![
        seed(
            "Complete cybersecurity guide for small businesses",
            "A practical 50-page guide to securing your company on a limited budget.",
            "Guide",
            "PDF",
            "2.8 MB",
            Some(50),
            1247,
            4.8,
            true,
            &["SMB", "Security", "Guide", "Practical"],
            "Beginner",
        ),
        seed(
            "Security checklist for developers",
            "A complete checklist for hardening your web applications.",
            "Checklist",
            "PDF",
            "1.2 MB",
            Some(15),
            892,
            4.9,
            true,
            &["Development", "Web", "Security", "Checklist"],
            "Intermediate",
        ),
        seed(
            "Python scripts for security work",
            "Ready-to-use Python scripts for security analysis.",
            "Scripts",
            "ZIP",
            "5.4 MB",
            None,
            1567,
            4.7,
            true,
            &["Python", "Scripts", "Automation", "Tools"],
            "Advanced",
        ),
        seed(
            "Security policy template",
            "A customizable IT security policy template for companies.",
            "Template",
            "DOC",
            "890 KB",
            Some(25),
            634,
            4.6,
            false,
            &["Policy", "Business", "Compliance", "Template"],
            "Beginner",
        ),
        seed(
            "Security audit guide",
            "A complete methodology for running an IT security audit.",
            "Guide",
            "PDF",
            "4.1 MB",
            Some(75),
            1089,
            4.8,
            true,
            &["Audit", "Methodology", "Security", "Business"],
            "Advanced",
        ),
    ]
    .into_iter()
    .map(Resource::from_create)
    .collect()
}
