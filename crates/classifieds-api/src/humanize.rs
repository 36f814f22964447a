//! Relative time labels ("3 hours ago") for listing and detail views.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Units used once a delta reaches a full day, largest first.
const CHUNKS: [(i64, &str, &str); 6] = [
    (365 * DAY, "year", "years"),
    (30 * DAY, "month", "months"),
    (7 * DAY, "week", "weeks"),
    (DAY, "day", "days"),
    (HOUR, "hour", "hours"),
    (MINUTE, "minute", "minutes"),
];

/// Describes `value` relative to `now`: "now", "a minute ago",
/// "5 hours ago", "1 day, 3 hours ago", "2 weeks from now".
pub fn natural_time(value: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(value).num_seconds();
    let suffix = if delta >= 0 { "ago" } else { "from now" };
    let secs = delta.abs();

    let phrase = if secs == 0 {
        return "now".to_string();
    } else if secs < MINUTE {
        counted(secs, "a second", "seconds")
    } else if secs < HOUR {
        counted(secs / MINUTE, "a minute", "minutes")
    } else if secs < DAY {
        counted(secs / HOUR, "an hour", "hours")
    } else {
        time_since(secs)
    };

    format!("{phrase} {suffix}")
}

fn counted(n: i64, one: &str, many: &str) -> String {
    if n == 1 { one.to_string() } else { format!("{n} {many}") }
}

/// At most two adjacent units, e.g. "1 month, 2 weeks" but never
/// "1 month, 3 days".
fn time_since(secs: i64) -> String {
    let Some(first) = CHUNKS.iter().position(|(size, _, _)| secs >= *size) else {
        return "0 minutes".to_string();
    };

    let mut parts = Vec::with_capacity(2);
    let mut remaining = secs;
    for (size, one, many) in CHUNKS.iter().skip(first).take(2) {
        let count = remaining / size;
        if count == 0 {
            break;
        }
        remaining -= count * size;
        parts.push(format!("{count} {}", if count == 1 { one } else { many }));
    }
    parts.join(", ")
}
