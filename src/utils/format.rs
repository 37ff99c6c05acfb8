//! Display formatting for process values.

use chrono::{DateTime, Local, TimeZone};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable size with binary units, e.g. `1.5 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}iB", bytes as f64 / div as f64, PREFIXES[exp])
}

/// Percentage with two decimals, without the `%` sign.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}")
}

/// Local wall-clock time for a millisecond UNIX timestamp.
pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

/// Same as [`format_timestamp`] in an explicit time zone.
pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

/// Character-safe truncation with a trailing ellipsis.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let truncated: String = text.chars().take(max_chars - 3).collect();
    format!("{truncated}...")
}
