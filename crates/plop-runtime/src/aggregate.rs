//! Time-windowed reductions over the full event log.
//!
//! Every query is a pure scan; the store has no index and none is kept
//! here. Window semantics deliberately mirror the long-standing behavior
//! of the production sheet:
//! - "today" is a string prefix match on the stored timestamp,
//! - the week window opens last Monday at now's time-of-day (not
//!   midnight),
//! - the month window compares month numbers only, ignoring the year.

use anyhow::Result;
use chrono::DateTime;
use chrono_tz::Tz;
use plop_core::{
    parse_timestamp, same_month, today_prefix, week_start, ContextKind, EventRecord, Window,
};

fn window_matches(record: &EventRecord, window: Window, now: DateTime<Tz>) -> Result<bool> {
    match window {
        Window::Day => Ok(record.timestamp.starts_with(&today_prefix(now))),
        Window::Week => Ok(parse_timestamp(&record.timestamp)? >= week_start(now)),
        Window::Month => Ok(same_month(parse_timestamp(&record.timestamp)?, now)),
    }
}

/// Counts one user's records inside the window, across all contexts.
pub fn self_count(
    records: &[EventRecord],
    actor_name: &str,
    window: Window,
    now: DateTime<Tz>,
) -> Result<usize> {
    let mut count = 0;
    for record in records {
        if record.actor_name == actor_name && window_matches(record, window, now)? {
            count += 1;
        }
    }
    Ok(count)
}

/// Ranks per-user counts for one exact context (kind and id both match).
///
/// Grouping keeps first-encounter order and the sort is stable, so users
/// with equal counts rank in the order their first record appears in the
/// log. The result is capped per window: 3 for the day board, 5 for week
/// and month.
pub fn leaderboard(
    records: &[EventRecord],
    context_kind: ContextKind,
    context_id: &str,
    window: Window,
    now: DateTime<Tz>,
) -> Result<Vec<(String, u64)>> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for record in records {
        if record.context_kind != context_kind || record.context_id != context_id {
            continue;
        }
        if !window_matches(record, window, now)? {
            continue;
        }
        match counts.iter_mut().find(|(name, _)| *name == record.actor_name) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.actor_name.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(window.leaderboard_cap());
    Ok(counts)
}
