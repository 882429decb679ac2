//! Time and timestamp helpers.

use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for due times, event records, and notifications.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Format a timestamp as a local wall-clock time (`HH:MM:SS`).
///
/// Used by reply and notification templates, which quote the time the
/// way a person would read it off a clock.
#[must_use]
pub fn format_clock(ts: Timestamp) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Format a timestamp for log rendering (`YYYY-MM-DD HH:MM:SS`, local time).
#[must_use]
pub fn format_log(ts: Timestamp) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
