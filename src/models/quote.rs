use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_email, new_id, require, timestamp, Validate, ValidationError};
use crate::repository::Record;

/// Output of the front end's price estimator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuoteData {
    pub project_type: String,
    pub complexity: String,
    pub timeline: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub maintenance: bool,
    #[serde(default)]
    pub training: bool,
    #[serde(default)]
    pub documentation: bool,
    pub base_price: f64,
    pub features_price: f64,
    pub extras_price: f64,
    pub total_price: f64,
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: String,
    pub quote_data: QuoteData,
    pub contact_info: Option<ContactInfo>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuoteCreate {
    pub quote_data: QuoteData,
    pub contact_info: Option<ContactInfo>,
}

/// Admin revision of a quote: the estimate and contact are replaced as a
/// whole, the status only when given.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuoteUpdate {
    pub quote_data: QuoteData,
    pub contact_info: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
}

impl Validate for QuoteUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        QuoteCreate {
            quote_data: self.quote_data.clone(),
            contact_info: self.contact_info.clone(),
        }
        .validate()
    }
}

impl Quote {
    pub fn from_request(input: QuoteCreate) -> Self {
        let now = Utc::now();
        Quote {
            id: new_id(),
            quote_data: input.quote_data,
            contact_info: input.contact_info,
            status: QuoteStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Quote {
    const COLLECTION: &'static str = "quotes";
    const LABEL: &'static str = "Quote";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "created_at": -1 })
    }
}

impl Validate for QuoteCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        let data = &self.quote_data;
        require("project_type", &data.project_type)?;
        let prices = [
            data.base_price,
            data.features_price,
            data.extras_price,
            data.total_price,
            data.min_price,
            data.max_price,
        ];
        if prices.iter().any(|price| !price.is_finite() || *price < 0.0) {
            return Err(ValidationError("prices must be non-negative numbers".to_string()));
        }
        if data.min_price > data.max_price {
            return Err(ValidationError("min_price must not exceed max_price".to_string()));
        }
        match &self.contact_info {
            Some(contact) => {
                require("name", &contact.name)?;
                check_email("email", &contact.email)
            }
            None => Ok(()),
        }
    }
}
