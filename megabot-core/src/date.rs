//! Date/time normalization module
//!
//! Accepted input patterns are plain data, tried in order:
//! - Date and time: "2024-12-25 1430", "2024-12-25 14:30", "25/12/2024 2:30 PM", "Dec 25 2024 14:30"
//! - Date only (midnight): "2024-12-25", "25/12/2024", "12/25/2024", "25 Dec 2024", "Dec 25 2024"
//!
//! Time-bearing patterns are tried before date-only ones, and the first
//! pattern that matches wins.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, Result};

/// Canonical form written to storage; round-trips through [`parse_date_time`]
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H%M";

const DISPLAY_DATE_FORMAT: &str = "%b %-d %Y";
const DISPLAY_DATE_TIME_FORMAT: &str = "%b %-d %Y %H:%M";

/// Patterns carrying a time of day
const DATE_TIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H%M",     // 2024-12-25 1430
    "%Y-%m-%d %H:%M",    // 2024-12-25 14:30
    "%Y-%m-%dT%H:%M",    // 2024-12-25T14:30
    "%d/%m/%Y %H:%M",    // 25/12/2024 14:30
    "%m/%d/%Y %H:%M",    // 12/25/2024 14:30
    "%Y-%m-%d %I:%M %p", // 2024-12-25 2:30 PM
    "%d/%m/%Y %I:%M %p", // 25/12/2024 2:30 PM
    "%m/%d/%Y %I:%M %p", // 12/25/2024 2:30 PM
    "%d %b %Y %H:%M",    // 25 Dec 2024 14:30
    "%b %d %Y %H:%M",    // Dec 25 2024 14:30
    "%b %d %Y %I:%M %p", // Dec 25 2024 2:30 PM
];

/// Date-only patterns; the time of day defaults to midnight
const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d", // 2024-12-25
    "%d/%m/%Y", // 25/12/2024
    "%m/%d/%Y", // 12/25/2024
    "%d-%m-%Y", // 25-12-2024
    "%m-%d-%Y", // 12-25-2024
    "%Y/%m/%d", // 2024/12/25
    "%d %b %Y", // 25 Dec 2024
    "%b %d %Y", // Dec 25 2024
];

/// Parse free-form text into a normalized point in time
///
/// Fails with [`CoreError::DateFormat`] when the text is blank or matches
/// none of the accepted patterns.
pub fn parse_date_time(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CoreError::date_format(input));
    }

    if let Some(dt) = DATE_TIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(input, pattern).ok())
    {
        return Ok(dt);
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDate::parse_from_str(input, pattern).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| CoreError::date_format(input))
}

/// Format a point in time in the canonical storage form
pub fn format_storage(dt: NaiveDateTime) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Format a point in time for display
///
/// Returns strings like "Dec 1 2023", or "Dec 1 2023 14:00" when the time
/// is not midnight.
pub fn format_display(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format(DISPLAY_DATE_FORMAT).to_string()
    } else {
        dt.format(DISPLAY_DATE_TIME_FORMAT).to_string()
    }
}
