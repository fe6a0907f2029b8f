use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{new_id, require, require_if_set, timestamp, Editable, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default, with = "timestamp::option")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct BlogPostCreate {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    pub read_time: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub published: bool,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct BlogPostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable", skip_serializing_if = "Option::is_none")]
    pub read_time: Option<Option<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl Record for BlogPost {
    const COLLECTION: &'static str = "blog_posts";
    const LABEL: &'static str = "Blog post";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "created_at": -1 })
    }
}

impl Editable for BlogPost {
    type Create = BlogPostCreate;
    type Patch = BlogPostUpdate;

    fn from_create(input: BlogPostCreate) -> Self {
        let now = Utc::now();
        BlogPost {
            id: new_id(),
            title: input.title,
            slug: input.slug,
            excerpt: input.excerpt,
            content: input.content,
            category: input.category,
            tags: input.tags,
            cover_image: input.cover_image,
            read_time: input.read_time,
            featured: input.featured,
            published: input.published,
            published_at: input.published.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn conflict(input: &BlogPostCreate) -> Option<(Document, &'static str)> {
        Some((
            doc! { "slug": input.slug.as_str() },
            "Blog post with this slug already exists",
        ))
    }

    fn conflict_on_update(&self, patch: &BlogPostUpdate) -> Option<(Document, &'static str)> {
        let slug = patch.slug.as_deref()?;
        Some((
            doc! { "slug": slug, "id": { "$ne": self.id.as_str() } },
            "Blog post with this slug already exists",
        ))
    }

    /// First publication stamps `published_at`; republishing keeps it.
    fn prepare_update(&self, fields: &mut Document) {
        let publishing = fields.get_bool("published").unwrap_or(false);
        if publishing && self.published_at.is_none() {
            fields.insert("published_at", timestamp::to_bson(&Utc::now()));
        }
    }
}

impl Validate for BlogPostCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        check_slug(&self.slug)?;
        require("content", &self.content)
    }
}

impl Validate for BlogPostUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_set("title", self.title.as_ref())?;
        require_if_set("content", self.content.as_ref())?;
        self.slug.as_deref().map_or(Ok(()), check_slug)
    }
}

fn check_slug(slug: &str) -> Result<(), ValidationError> {
    require("slug", slug)?;
    let url_safe = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !url_safe {
        return Err(ValidationError(
            "slug may only contain lowercase letters, digits and dashes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BlogPostCreate {
        BlogPostCreate {
            title: "Hardening nginx".to_string(),
            slug: "hardening-nginx".to_string(),
            excerpt: "A short checklist".to_string(),
            content: "Body".to_string(),
            category: "Security".to_string(),
            tags: vec![],
            cover_image: None,
            read_time: Some(4),
            featured: false,
            published: false,
        }
    }

    #[test]
    fn publishing_on_create_stamps_published_at() {
        assert!(BlogPost::from_create(draft()).published_at.is_none());
        let post = BlogPost::from_create(BlogPostCreate {
            published: true,
            ..draft()
        });
        assert_eq!(post.published_at, Some(post.created_at));
    }

    #[test]
    fn first_publication_is_stamped_once() {
        let mut post = BlogPost::from_create(draft());
        let mut fields = doc! { "published": true };
        post.prepare_update(&mut fields);
        assert!(fields.contains_key("published_at"));

        post.published_at = Some(Utc::now());
        let mut fields = doc! { "published": true };
        post.prepare_update(&mut fields);
        assert!(!fields.contains_key("published_at"));
    }

    #[test]
    fn slug_must_be_url_safe() {
        assert!(draft().validate().is_ok());
        let bad = BlogPostCreate {
            slug: "Hello World".to_string(),
            ..draft()
        };
        assert!(bad.validate().is_err());
    }
}
