//! Date ranges used by the dashboard statistics.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::datetime::parse_query_date;
use crate::errors::{AgendaError, AgendaResult};

/// Longest range the statistics endpoints accept unless configured otherwise.
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 366;

pub const OUT_OF_RANGE: &str = "Date out of range";

/// Range as supplied by a caller. Every bound is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub week_start: Option<NaiveDate>,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Sunday on or before `date`. Dates in the first week chrono can represent
/// clamp to `NaiveDate::MIN`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(date.weekday().num_days_from_sunday() as u64))
        .unwrap_or(NaiveDate::MIN)
}

fn shift(date: NaiveDate, days: i64) -> AgendaResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AgendaError::validation(OUT_OF_RANGE))
}

impl DateRange {
    /// Builds a range from raw query values, parsing each one leniently.
    pub fn from_query(
        start_date: Option<&str>,
        end_date: Option<&str>,
        week_start: Option<&str>,
    ) -> AgendaResult<Self> {
        let parse = |value: Option<&str>| -> AgendaResult<Option<NaiveDate>> {
            match value.map(str::trim).filter(|s| !s.is_empty()) {
                Some(s) => parse_query_date(s).map(Some),
                None => Ok(None),
            }
        };

        Ok(Self {
            start_date: parse(start_date)?,
            end_date: parse(end_date)?,
            week_start: parse(week_start)?,
        })
    }

    /// The Sunday-aligned week containing `today`, with all three bounds set.
    pub fn current_week(today: NaiveDate) -> Self {
        let start = week_start_for(today);
        Self {
            start_date: Some(start),
            end_date: Some(start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX)),
            week_start: Some(start),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.week_start.is_none()
    }

    /// Resolves the optional bounds into a concrete inclusive range.
    ///
    /// Explicit start/end win over the week anchor. A single missing bound is
    /// filled so the range spans one week. Reversed bounds are swapped.
    pub fn resolve(&self, today: NaiveDate, max_days: i64) -> AgendaResult<ResolvedRange> {
        let (start, end) = match (self.start_date, self.end_date, self.week_start) {
            (Some(start), Some(end), _) => (start, end),
            (Some(start), None, _) => (start, shift(start, 6)?),
            (None, Some(end), _) => (shift(end, -6)?, end),
            (None, None, Some(anchor)) => (anchor, shift(anchor, 6)?),
            (None, None, None) => {
                let start = week_start_for(today);
                (start, shift(start, 6)?)
            }
        };

        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        // The store queries by the midnight after the last day.
        shift(end, 1)?;
        let range = ResolvedRange { start, end };

        if range.len_days() > max_days {
            return Err(AgendaError::validation(format!(
                "Date range of {} days exceeds the maximum of {} days",
                range.len_days(),
                max_days
            )));
        }

        Ok(range)
    }
}

impl ResolvedRange {
    /// Number of calendar days in the range, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let date = timestamp.date();
        date >= self.start && date <= self.end
    }

    /// Midnight at the start of the first day.
    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Midnight after the last day, or the latest representable instant
    /// when the range ends on `NaiveDate::MAX`.
    pub fn end_exclusive(&self) -> NaiveDateTime {
        self.end
            .succ_opt()
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN))
    }
}
