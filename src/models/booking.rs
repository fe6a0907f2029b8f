use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use super::{check_email, new_id, require, timestamp, Validate, ValidationError};
use crate::repository::Record;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookingData {
    pub service_id: String,
    pub service_name: String,
    /// Opaque calendar key, compared by exact string match.
    pub date: String,
    pub time: String,
    pub duration: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BookingContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub booking_data: BookingData,
    pub contact_info: BookingContact,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookingCreate {
    pub booking_data: BookingData,
    pub contact_info: BookingContact,
}

#[derive(Deserialize, Debug)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

impl Booking {
    pub fn from_request(input: BookingCreate) -> Self {
        let now = Utc::now();
        Booking {
            id: new_id(),
            booking_data: input.booking_data,
            contact_info: input.contact_info,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Booking {
    const COLLECTION: &'static str = "bookings";
    const LABEL: &'static str = "Booking";

    fn id(&self) -> &str {
        &self.id
    }

    fn sort() -> Option<Document> {
        Some(doc! { "created_at": -1 })
    }
}

impl Validate for BookingCreate {
    fn validate(&self) -> Result<(), ValidationError> {
        require("service_id", &self.booking_data.service_id)?;
        require("date", &self.booking_data.date)?;
        require("time", &self.booking_data.time)?;
        require("name", &self.contact_info.name)?;
        check_email("email", &self.contact_info.email)
    }
}
