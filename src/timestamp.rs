//! Timestamp (de)serialization for store documents.
//!
//! Timestamps are written as RFC 3339 in UTC with millisecond precision
//! (`2025-03-15T14:30:00.000Z`). Any RFC 3339 offset is accepted on read.
//! Stores call [`fill_missing`] on raw records before deserializing, so a
//! missing or unparsable required timestamp becomes the clock's "now"
//! instead of failing the whole document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Formats a timestamp the way store documents spell it.
#[must_use]
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Replaces each of `keys` in a JSON object with `now` when it is missing
/// or not a readable timestamp. Non-objects are left alone.
pub fn fill_missing(record: &mut Value, keys: &[&str], now: &DateTime<Utc>) {
    let Some(fields) = record.as_object_mut() else {
        return;
    };
    for key in keys {
        let readable = fields.get(*key).and_then(Value::as_str).and_then(parse);
        if readable.is_none() {
            fields.insert((*key).to_string(), Value::String(format(now)));
        }
    }
}

/// Serializer for required timestamps.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

/// Deserializer for required timestamps.
///
/// # Errors
///
/// Fails when the value is not an RFC 3339 string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Optional timestamps: absent or unreadable values become `None`.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializer for optional timestamps.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        ts: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializer for optional timestamps.
    ///
    /// # Errors
    ///
    /// Propagates deserializer errors for structurally invalid input.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(super::parse))
    }
}
