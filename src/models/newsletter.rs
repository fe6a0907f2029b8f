use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_email, new_id, timestamp, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Unsubscribed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewsletterSubscription {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(with = "timestamp")]
    pub subscribed_at: DateTime<Utc>,
}

impl NewsletterSubscription {
    pub fn new(email: String) -> Self {
        NewsletterSubscription {
            id: new_id(),
            email,
            status: SubscriptionStatus::Active,
            subscribed_at: Utc::now(),
        }
    }
}

impl Record for NewsletterSubscription {
    const COLLECTION: &'static str = "newsletter_subscriptions";
    const LABEL: &'static str = "Subscription";
    const LOOKUP_FIELD: &'static str = "email";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "subscribed_at": -1 })
    }
}

#[derive(Deserialize, Debug)]
pub struct NewsletterSubscribe {
    pub email: String,
}

impl Validate for NewsletterSubscribe {
    fn validate(&self) -> Result<(), ValidationError> {
        check_email("email", &self.email)
    }
}
