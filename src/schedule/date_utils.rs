use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::error::{MarchenError, Result};

/// Calendar day of a timestamp as seen from the given offset
pub fn day_in_offset(timestamp: &DateTime<FixedOffset>, offset: FixedOffset) -> NaiveDate {
    timestamp.with_timezone(&offset).date_naive()
}

/// Parses a day from "YYYY-MM-DD" or an RFC 3339 timestamp
/// Timestamps are reduced to their calendar day in `offset`; time of day is dropped
pub fn parse_day(text: &str, offset: FixedOffset) -> Result<NaiveDate> {
    let trimmed = text.trim();

    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| day_in_offset(&ts, offset))
        .map_err(|_| MarchenError::InvalidDate {
            input: trimmed.to_string(),
        })
}

/// Splits a cell such as "2026-04-01, 2026-04-02; 2026-04-05" into trimmed, non-empty parts
pub fn split_date_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(&[',', ';'][..])
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Parses a UTC offset given as "+09:00", "-05:30", "Z" or a whole number of hours ("9", "-5")
pub fn parse_utc_offset(text: &str) -> Result<FixedOffset> {
    let trimmed = text.trim();
    let invalid = || MarchenError::InvalidInput(format!("Invalid UTC offset: {}", trimmed));

    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(utc());
    }

    let seconds = if let Some((hours, minutes)) = trimmed.split_once(':') {
        let sign = if hours.starts_with('-') { -1 } else { 1 };
        let hours: i32 = hours.trim_start_matches(&['+', '-'][..]).parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        sign * (hours * 3600 + minutes * 60)
    } else {
        let hours: i32 = trimmed.parse().map_err(|_| invalid())?;
        hours * 3600
    };

    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

pub fn utc() -> FixedOffset {
    Utc.fix()
}
