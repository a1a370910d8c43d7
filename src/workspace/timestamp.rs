//! Timestamp formats for history records.
//!
//! Locally the canonical form is RFC 3339 with nanoseconds and a `Z` suffix.
//! The wire form drops the fractional part. Parsing accepts, in order:
//! RFC 3339, an offset-qualified form without fractional seconds, a literal
//! `Z` suffix, and a space-separated form without any zone (read as UTC).

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

const OFFSET_NO_FRACTION: &str = "%Y-%m-%dT%H:%M:%S%:z";
const UTC_SUFFIX: &str = "%Y-%m-%dT%H:%M:%SZ";
const SPACE_SEPARATED: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_canonical(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn format_wire(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::<FixedOffset>::parse_from_str(raw, OFFSET_NO_FRACTION) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in [UTC_SUFFIX, SPACE_SEPARATED] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(Error::TimestampParse(raw.to_string()))
}

/// `#[serde(with = ...)]` adapter using the canonical form and the fallback parser.
pub mod serde_canonical {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_canonical(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
