use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::datetime::on_the_hour;
use crate::errors::{AgendaError, AgendaResult};

const DEFAULT_OPEN: NaiveTime = on_the_hour(7);
const DEFAULT_CLOSE: NaiveTime = on_the_hour(13);

/// Opening window used as the denominator of occupancy percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for BusinessHours {
    /// Monday to Friday, 07:00 to 13:00.
    fn default() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start: DEFAULT_OPEN,
            end: DEFAULT_CLOSE,
        }
    }
}

impl BusinessHours {
    pub fn new(days: Vec<Weekday>, start: NaiveTime, end: NaiveTime) -> AgendaResult<Self> {
        if start >= end {
            return Err(AgendaError::validation(format!(
                "Business hours must start before they end ({} >= {})",
                start, end
            )));
        }

        Ok(Self { days, start, end })
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        self.days.contains(&date.weekday())
    }

    /// Bookable hours on `date`; zero outside the configured weekdays.
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        if !self.is_business_day(date) {
            return 0.0;
        }
        (self.end - self.start).num_minutes() as f64 / 60.0
    }

    /// Parses a comma-separated list of weekdays.
    ///
    /// Numbers follow the calendar widget convention (0 = Sunday ... 6 =
    /// Saturday); three-letter English names (`mon`, `tue`, ...) are accepted
    /// as well.
    pub fn parse_days(value: &str) -> AgendaResult<Vec<Weekday>> {
        let mut days = Vec::new();

        for item in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let day = match item.parse::<u32>() {
                Ok(0) => Weekday::Sun,
                Ok(1) => Weekday::Mon,
                Ok(2) => Weekday::Tue,
                Ok(3) => Weekday::Wed,
                Ok(4) => Weekday::Thu,
                Ok(5) => Weekday::Fri,
                Ok(6) => Weekday::Sat,
                Ok(_) => {
                    return Err(AgendaError::validation(format!(
                        "Invalid business day '{}'. Expected 0-6",
                        item
                    )));
                }
                Err(_) => item.parse::<Weekday>().map_err(|_| {
                    AgendaError::validation(format!("Invalid business day '{}'", item))
                })?,
            };

            if !days.contains(&day) {
                days.push(day);
            }
        }

        Ok(days)
    }

    /// Parses `HH:mm` (seconds optional).
    pub fn parse_time(value: &str) -> AgendaResult<NaiveTime> {
        let value = value.trim();
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .map_err(|_| AgendaError::validation(format!("Invalid time '{}'. Expected HH:mm", value)))
    }
}
