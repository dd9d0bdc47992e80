//! Serde helpers for the timestamp format used in the state files.
//!
//! Timestamps are written as `"Mon, 02 Jan 2017 15:04:05 UTC"`. RFC 3339
//! strings are accepted on read as well.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use xo_core::constants::SERIALIZED_DATE_FORMAT;

/// Format a timestamp the way the state files store it.
pub fn format(at: &DateTime<Utc>) -> String {
    at.format(SERIALIZED_DATE_FORMAT).to_string()
}

/// Parse a stored timestamp.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, SERIALIZED_DATE_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn serialize<S>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(at))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Like [`deserialize`], but unreadable values become the current time.
pub fn deserialize_or_now<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse).unwrap_or_else(Utc::now))
}
