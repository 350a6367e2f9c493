//! Date/time helpers for stored UTC timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Display format used in API responses.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a UTC timestamp for display.
pub fn format_display(dt: &DateTime<Utc>) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Format an optional timestamp, rendering `None` as an empty string.
pub fn format_optional(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_display).unwrap_or_default()
}

/// Parse a query-string time bound.
///
/// Accepts RFC3339, `YYYY-MM-DD HH:MM:SS` and a bare `YYYY-MM-DD` (midnight).
/// Values without an offset are taken as UTC. Returns `None` for blank or
/// unparseable input.
pub fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, DISPLAY_FORMAT) {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
