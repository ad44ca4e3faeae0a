//! Note timestamps.
//!
//! The format is fixed: weekday, month, day, time, zone abbreviation, year
//! (e.g. `Mon Jan 01 19:04:05 PST 2024`).

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::Display;

pub const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Formats `at` with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Z>(at: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats the current time in `timezone`.
pub fn current_timestamp(timezone: Tz) -> String {
    format_timestamp(&Utc::now().with_timezone(&timezone))
}
