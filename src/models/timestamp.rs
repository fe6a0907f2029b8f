//! Serde codec for UTC timestamps.
//!
//! Timestamps are written as fixed-width RFC 3339 strings with millisecond
//! precision, so the store can compare and sort them as plain strings.
//! BSON dates written by earlier deployments are still accepted on read.

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::Bson;
use serde::de::{self, Deserialize, Deserializer};
use serde::Serializer;

pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn to_bson(value: &DateTime<Utc>) -> Bson {
    Bson::String(format(value))
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    from_bson(Bson::deserialize(deserializer)?)
}

fn from_bson<E: de::Error>(value: Bson) -> Result<DateTime<Utc>, E> {
    match value {
        Bson::String(raw) => DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|e| E::custom(format_args!("invalid timestamp {raw:?}: {e}"))),
        Bson::DateTime(date) => DateTime::from_timestamp_millis(date.timestamp_millis())
            .ok_or_else(|| E::custom("timestamp out of range")),
        other => Err(E::custom(format_args!("expected a timestamp, found {other}"))),
    }
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::Null => Ok(None),
            value => from_bson(value).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        assert_eq!(format(&whole), "2025-06-10T09:00:00.000Z");
        let later = whole + chrono::Duration::milliseconds(1500);
        assert_eq!(format(&later), "2025-06-10T09:00:01.500Z");
        assert!(format(&whole) < format(&later));
    }

    #[test]
    fn reads_strings_and_bson_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let parsed: DateTime<Utc> =
            from_bson::<de::value::Error>(Bson::String("2024-01-02T03:04:05Z".into())).unwrap();
        assert_eq!(parsed, expected);

        let legacy = Bson::DateTime(mongodb::bson::DateTime::from_millis(expected.timestamp_millis()));
        assert_eq!(from_bson::<de::value::Error>(legacy).unwrap(), expected);
    }
}
