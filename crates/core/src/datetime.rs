//! Wire formats for event timestamps and statistics dates.
//!
//! The server always emits `yyyy-MM-dd HH:mm` for event start/end and
//! `yyyy-MM-dd` for dates. Incoming values are parsed leniently because the
//! browser sends whatever its `datetime-local` input or its own formatter
//! produced.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::{AgendaError, AgendaResult};

/// Format used for event start/end in responses (`2024-06-03 09:00`).
pub const EVENT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format produced by an HTML `datetime-local` input (`2024-06-03T09:00`).
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Date-only format used by the statistics endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `hour:00:00`, checked at compile time when used in a `const`.
pub const fn on_the_hour(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => time,
        None => panic!("hour must be below 24"),
    }
}

const DATETIME_FORMATS: &[&str] = &[
    INPUT_FORMAT,
    EVENT_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a client supplied event timestamp.
///
/// Accepts both separators (`T` or a space), optional seconds and fractional
/// seconds, RFC 3339 strings (the wall-clock part is kept), and a bare date,
/// which resolves to midnight.
pub fn parse_event_datetime(value: &str) -> AgendaResult<NaiveDateTime> {
    let value = value.trim();

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(AgendaError::validation(format!(
        "Invalid date-time '{}'. Expected yyyy-MM-dd HH:mm",
        value
    )))
}

/// Parses a statistics query date, dropping any time component.
pub fn parse_query_date(value: &str) -> AgendaResult<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }

    parse_event_datetime(value)
        .map(|dt| dt.date())
        .map_err(|_| {
            AgendaError::validation(format!("Invalid date '{}'. Expected yyyy-MM-dd", value))
        })
}

pub fn format_event_datetime(value: &NaiveDateTime) -> String {
    value.format(EVENT_FORMAT).to_string()
}

pub fn format_input_datetime(value: &NaiveDateTime) -> String {
    value.format(INPUT_FORMAT).to_string()
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}
