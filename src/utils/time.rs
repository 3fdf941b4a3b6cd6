//! Time and timestamp utilities

use chrono::{DateTime, FixedOffset, Local, ParseError};

/// Format used for backup file suffixes; sorts lexically in time order
pub const BACKUP_SUFFIX_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Current local time with its offset
pub fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Parse an RFC 3339 timestamp, keeping its offset
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    DateTime::parse_from_rfc3339(value.trim())
}

/// Second-granularity suffix for a rotated log, e.g. `2026-01-23T14-30-00`
pub fn backup_suffix<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(BACKUP_SUFFIX_FORMAT).to_string()
}
