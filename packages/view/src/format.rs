//! Date and time presentation helpers.
//!
//! The backend sends the call date and time-of-day as separate strings, and
//! the date frequently arrives with a spurious midnight time component
//! (`2024-06-01T00:00:00.000`) that must be discarded before combining.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Placeholder shown when a call's date/time cannot be parsed.
pub const TIME_UNKNOWN: &str = "time unknown";

/// Combines the backend's `date` and `time` strings into one timestamp.
///
/// Any time-of-day component on the date string is discarded; the `time`
/// string is authoritative for time of day. Returns `None` if either part
/// fails to parse.
#[must_use]
pub fn combine_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date_part = date.split('T').next().unwrap_or(date).trim();
    let parsed_date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let parsed_time = parse_time(time.trim())?;
    Some(parsed_date.and_time(parsed_time))
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    for fmt in ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"] {
        if let Ok(parsed) = NaiveTime::parse_from_str(time, fmt) {
            return Some(parsed);
        }
    }
    None
}

/// Renders a call's date/time for a list row, relative to `now` when the
/// call is recent and absolute otherwise.
///
/// Unparseable input renders as [`TIME_UNKNOWN`] rather than failing.
#[must_use]
pub fn time_label(date: &str, time: &str, now: NaiveDateTime) -> String {
    let Some(at) = combine_date_time(date, time) else {
        return TIME_UNKNOWN.to_string();
    };

    let seconds = now.signed_duration_since(at).num_seconds();
    if !(0..43_200).contains(&seconds) {
        // Future or older than 12h: show the clock time instead.
        return at.format("%H:%M").to_string();
    }
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else {
        format!("{}h ago", seconds / 3600)
    }
}
