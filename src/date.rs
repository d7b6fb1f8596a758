//! Date header parsing

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};

/// Format used by the provider's `Date` header
pub const DATE_HEADER_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Parse a `Date` header value, keeping its UTC offset.
///
/// Returns `None` for empty or unparsable input; a bad date never fails the
/// message it belongs to.
#[must_use]
pub fn parse_received_at(value: &str) -> Option<DateTime<FixedOffset>> {
    parse_date_strict(value).ok()
}

/// Like [`parse_received_at`] but reports why the value was rejected.
///
/// The fixed header format is tried first, then the general RFC 2822
/// grammar, which also accepts a missing weekday or a single-digit day.
pub fn parse_date_strict(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidDate("empty value".into()));
    }

    DateTime::parse_from_str(value, DATE_HEADER_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map_err(|e| Error::InvalidDate(format!("{value}: {e}")))
}
