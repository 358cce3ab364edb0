//! Canonical textual timestamps
//!
//! Modification times are written as RFC 3339 with a nine digit fraction and
//! a numeric offset (`2024-05-01T10:00:00.123456789+00:00`). Parsing that
//! text yields the exact same instant and offset.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::time::SystemTime;

use crate::{Error, Result};

/// Format a timestamp in the canonical form.
pub fn format(time: &DateTime<FixedOffset>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, false)
}

/// Parse a timestamp written by [`format`] (or any RFC 3339 timestamp).
pub fn parse(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| Error::InvalidTimestamp {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Convert a filesystem time into a UTC timestamp, keeping nanoseconds.
pub fn from_system_time(time: SystemTime) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from(time).fixed_offset()
}

/// Serde adapter storing a timestamp in the canonical textual form.
pub mod serde_text {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &DateTime<FixedOffset>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<FixedOffset>, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse(&value).map_err(serde::de::Error::custom)
    }
}
