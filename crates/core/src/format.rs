//! Display formatting helpers.
//!
//! Timestamps arrive from the API in UTC; callers pick the zone to
//! render in (tests use UTC, interactive callers usually convert to
//! local time first).

use chrono::{DateTime, TimeZone};

use crate::types::Timestamp;

/// Human-readable byte count: `863 B`, `1.2 KB`, `4.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Cut text to at most `max_chars` characters, appending `...` when
/// anything was dropped. Operates on characters, not bytes.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// `15 Jan 2026, 2:30 PM`
pub fn format_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%-d %b %Y, %-I:%M %p").to_string()
}

/// `15 Jan, 2:30 PM`, for dense tables.
pub fn format_compact_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.format("%-d %b, %-I:%M %p").to_string()
}

/// Relative wording for recent timestamps, falling back to
/// [`format_timestamp`] once `then` is a week old.
///
/// `now` is passed in rather than read from the clock so the output is
/// deterministic. Timestamps at or ahead of `now` render as "Just now".
pub fn format_relative(then: &Timestamp, now: &Timestamp) -> String {
    let minutes = now.signed_duration_since(*then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} minute{} ago", plural(minutes));
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days} day{} ago", plural(days));
    }
    format_timestamp(then)
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
