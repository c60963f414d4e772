//! Serde helpers for calendar dates.
//!
//! The API hands back dates either as plain `YYYY-MM-DD` strings or as full
//! RFC 3339 timestamps (`2024-01-05T00:00:00.000Z`). Both decode to a
//! [`NaiveDate`]; dates always encode as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a date in any of the shapes the API produces.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    // Timestamps without an offset, e.g. `2024-01-05T10:30:00`
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

/// `#[serde(with = "dates::optional")]` for `Option<NaiveDate>` fields.
pub mod optional {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_date(value).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognised date '{value}'"))
            }),
        }
    }
}

/// `#[serde(with = "dates::clearable")]` for patch fields: absent leaves the
/// stored date alone, `null` clears it.
pub mod clearable {
    use super::*;

    pub fn serialize<S>(
        date: &Option<Option<NaiveDate>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::optional::serialize(&(*date).flatten(), serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::optional::deserialize(deserializer).map(Some)
    }
}
