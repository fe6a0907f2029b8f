use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_email, check_range, new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    /// 1 to 5 stars.
    pub rating: i32,
    pub order_index: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct TestimonialCreate {
    pub name: String,
    pub role: String,
    pub company: String,
    pub content: String,
    pub rating: i32,
    pub order_index: Option<i32>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TestimonialUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl Record for Testimonial {
    const COLLECTION: &'static str = "testimonials";
    const LABEL: &'static str = "Testimonial";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "order_index": 1 })
    }
}

impl Editable for Testimonial {
    type Create = TestimonialCreate;
    type Patch = TestimonialUpdate;

    fn from_create(input: TestimonialCreate) -> Self {
        let now = Utc::now();
        Testimonial {
            id: new_id(),
            name: input.name,
            role: input.role,
            company: input.company,
            content: input.content,
            rating: input.rating,
            order_index: input.order_index,
            featured: input.featured,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for TestimonialCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("content", &self.content)?;
        check_range("rating", i64::from(self.rating), 1, 5)
    }
}

impl Validate for TestimonialUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("name", self.name.as_ref())?;
        require_if_set("content", self.content.as_ref())?;
        self.rating
            .map_or(Ok(()), |rating| check_range("rating", i64::from(rating), 1, 5))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

/// A visitor-submitted testimonial waiting for moderation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingTestimonial {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: String,
    pub rating: i32,
    pub status: ReviewStatus,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
pub struct TestimonialSubmission {
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub content: String,
    pub rating: i32,
}

impl Record for PendingTestimonial {
    const COLLECTION: &'static str = "pending_testimonials";
    const LABEL: &'static str = "Pending testimonial";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "submitted_at": -1 })
    }
}

impl PendingTestimonial {
    pub fn from_submission(input: TestimonialSubmission) -> Self {
        PendingTestimonial {
            id: new_id(),
            name: input.name,
            email: input.email,
            role: input.role,
            company: input.company,
            content: input.content,
            rating: input.rating,
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }

    /// The public testimonial created when this submission is approved.
    pub fn to_testimonial(&self) -> Testimonial {
        let now = Utc::now();
        Testimonial {
            id: new_id(),
            name: self.name.clone(),
            role: self.role.clone().unwrap_or_else(|| "Client".to_string()),
            company: self.company.clone().unwrap_or_default(),
            content: self.content.clone(),
            rating: self.rating,
            order_index: None,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Validate for TestimonialSubmission {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("content", &self.content)?;
        if let Some(email) = &self.email {
            check_email("email", email)?;
        }
        check_range("rating", i64::from(self.rating), 1, 5)
    }
}
