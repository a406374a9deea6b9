//! Wall-clock helpers for `HH:MM` times of day.
//!
//! Trips carry their times as strings so malformed input can be stored and
//! reported back unchanged. Everything that compares times goes through here.

use chrono::{NaiveTime, Timelike};

pub const CLOCK_FORMAT: &str = "%H:%M";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse an `HH:MM` string. Returns `None` for anything else.
pub fn parse(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT).ok()
}

pub fn format(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Minutes since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Format a minute offset, wrapping past midnight.
pub fn format_minute_of_day(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minute span of a `[departure, arrival)` window. An arrival earlier than
/// the departure falls on the following day.
pub fn window(departure: &str, arrival: &str) -> Option<(u32, u32)> {
    let start = minute_of_day(parse(departure)?);
    let mut end = minute_of_day(parse(arrival)?);
    if end < start {
        end += MINUTES_PER_DAY;
    }
    Some((start, end))
}

/// Hour component of an `HH:MM` string.
pub fn hour_of(value: &str) -> Option<u32> {
    parse(value).map(|time| time.hour())
}

/// Fractional hours elapsed from `start` to `now`, or zero if `now` is earlier.
pub fn hours_since(start: NaiveTime, now: NaiveTime) -> f64 {
    if now < start {
        return 0.0;
    }
    (now - start).num_seconds() as f64 / 3600.0
}
