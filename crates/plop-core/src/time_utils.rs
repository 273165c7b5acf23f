//! Timestamp formatting and window arithmetic in the configured timezone.
//!
//! Stored timestamps are local wall-clock strings, so comparisons happen on
//! naive datetimes; the timezone only matters when capturing "now".

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDateTime};
use chrono_tz::Tz;

/// Fixed storage format for event timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats an instant as the stored wall-clock string.
pub fn format_timestamp(now: DateTime<Tz>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Date prefix used by the string-match "today" predicate.
pub fn today_prefix(now: DateTime<Tz>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Parses a stored timestamp. A malformed value is a query-fatal error.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .with_context(|| format!("malformed stored timestamp '{value}'"))
}

/// Start of the week window: most recent Monday, keeping now's time-of-day.
/// Not truncated to midnight; a Monday-morning record logged earlier than
/// the query time falls outside the window. Kept as-is on purpose.
pub fn week_start(now: DateTime<Tz>) -> NaiveDateTime {
    now.naive_local() - Duration::days(i64::from(now.weekday().num_days_from_monday()))
}

/// Month predicate: month number only, year ignored (records from the same
/// month of a previous year still count). Kept as-is on purpose.
pub fn same_month(parsed: NaiveDateTime, now: DateTime<Tz>) -> bool {
    parsed.month() == now.month()
}
