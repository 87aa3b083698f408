//! Textual watermark encoding shared by every store.
//!
//! Values are RFC 3339 in UTC with exactly six fractional digits and a `Z`
//! suffix, e.g. `2024-05-01T11:59:00.000000Z`. Fixed width and a fixed zone
//! make the text order the same as the time order.

use crate::error::StoreError;
use chrono::{DateTime, SecondsFormat, Utc};

pub fn encode(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Blank values count as absent.
pub fn decode(key: &str, raw: &str) -> Result<Option<DateTime<Utc>>, StoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|source| StoreError::Decode {
            key: key.to_string(),
            value: raw.to_string(),
            source,
        })
}

pub fn decode_bytes(key: &str, raw: &[u8]) -> Result<Option<DateTime<Utc>>, StoreError> {
    let text = std::str::from_utf8(raw).map_err(|_| StoreError::Utf8 {
        key: key.to_string(),
    })?;
    decode(key, text)
}
