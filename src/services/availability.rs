use mongodb::bson::{doc, Document};
use serde::Serialize;

use crate::models::booking::{Booking, BookingStatus};
use crate::repository::{Repository, StoreResult};

/// Bookable half-hour markers of a working day, in display order. The lunch
/// gap between 11:30 and 14:00 is never offered.
pub const SLOT_CATALOG: [&str; 13] = [
    "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00",
];

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub date: String,
    pub available_slots: Vec<String>,
    pub booked_slots: Vec<String>,
}

/// Bookings occupying a slot on `date`; cancelled ones free their slot.
pub fn occupying(date: &str) -> Document {
    doc! {
        "booking_data.date": date,
        "status": { "$ne": BookingStatus::Cancelled.as_str() },
    }
}

/// Catalog minus the booked set, in catalog order. `booked` is echoed back
/// untouched, duplicates included.
pub fn compute(date: &str, booked: Vec<String>) -> Availability {
    let available_slots = SLOT_CATALOG
        .iter()
        .filter(|slot| !booked.iter().any(|taken| taken == *slot))
        .map(|slot| slot.to_string())
        .collect();

    Availability {
        date: date.to_string(),
        available_slots,
        booked_slots: booked,
    }
}

pub async fn for_date(bookings: &Repository<Booking>, date: &str) -> StoreResult<Availability> {
    let booked = bookings
        .list_sorted(occupying(date), None)
        .await?
        .into_iter()
        .map(|booking| booking.booking_data.time)
        .collect();
    Ok(compute(date, booked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_day_offers_the_whole_catalog() {
        let day = compute("2025-06-10", Vec::new());
        assert_eq!(day.available_slots.len(), 13);
        assert_eq!(day.available_slots, SLOT_CATALOG.map(String::from).to_vec());
        assert!(day.booked_slots.is_empty());
    }

    #[test]
    fn booked_slots_are_removed_in_catalog_order() {
        let day = compute("2025-06-10", vec!["15:00".into(), "09:30".into()]);
        assert_eq!(day.available_slots.len(), 11);
        assert!(!day.available_slots.contains(&"09:30".to_string()));
        assert_eq!(day.available_slots[0], "09:00");
        assert_eq!(day.available_slots[1], "10:00");
        assert_eq!(day.booked_slots, vec!["15:00", "09:30"]);
    }

    #[test]
    fn duplicates_are_echoed_and_off_catalog_times_ignored() {
        let day = compute("2025-06-10", vec!["10:00".into(), "10:00".into(), "12:15".into()]);
        assert_eq!(day.booked_slots, vec!["10:00", "10:00", "12:15"]);
        assert_eq!(day.available_slots.len(), 12);
    }

    #[test]
    fn slot_matching_is_exact() {
        let day = compute("2025-06-10", vec!["9:00".into()]);
        assert!(day.available_slots.contains(&"09:00".to_string()));
    }
}
