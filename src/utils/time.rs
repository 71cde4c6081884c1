// src/utils/time.rs

//! Timestamp parsing for drop start dates.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a start timestamp as found in post fields.
///
/// Accepts RFC 3339 (including a trailing `Z`), optionally wrapped in quote
/// characters. Zone-less timestamps are read as UTC. Anything else is
/// `None`.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '\\')
        .trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(cleaned, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
