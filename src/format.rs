//! Human readable file sizes and timestamps.

use std::fmt::Display;

use chrono::{Local, TimeZone};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with binary units, at most two decimals.
///
/// `0` → `"0 B"`, `1536` → `"1.5 KB"`. Units stop at GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Format a Unix millisecond timestamp in the local time zone.
pub fn format_timestamp(millis: i64) -> String {
    format_timestamp_in(millis, &Local)
}

/// Format a Unix millisecond timestamp as `Y/M/D HH:MM:SS` in `tz`.
///
/// Out-of-range timestamps format as `"-"`.
pub fn format_timestamp_in<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y/%-m/%-d %H:%M:%S").to_string(),
        None => {
            log::debug!("Timestamp {} is out of range", millis);
            "-".to_string()
        }
    }
}
