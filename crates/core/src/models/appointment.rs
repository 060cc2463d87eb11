use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date_range::ResolvedRange;

/// Two-valued flag stored on appointments (confirmed, cancelled, reminder).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { YesNo::Yes } else { YesNo::No }
    }
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value.is_yes()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub is_confirmed: YesNo,
    pub is_cancelled: YesNo,
    pub cancellation_reason: Option<String>,
    pub meeting_link: Option<String>,
    pub send_reminder: YesNo,
    pub user_id: i64,
    pub user_email: String,
}

impl Appointment {
    /// Scheduled length in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_minutes() as f64 / 60.0
    }
}

/// Fields needed to book a new appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub is_confirmed: YesNo,
    pub send_reminder: YesNo,
    pub user_id: i64,
    pub user_email: String,
}

/// Full replacement of the mutable appointment fields.
///
/// Callers merge partial input with the stored record before building one of
/// these; the store overwrites every column it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentUpdate {
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub location: Option<String>,
    pub is_confirmed: YesNo,
    pub is_cancelled: YesNo,
    pub cancellation_reason: Option<String>,
    pub meeting_link: Option<String>,
    pub send_reminder: YesNo,
}

/// Filter for appointment range queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentQuery {
    /// Inclusive lower bound on `start_time`.
    pub starts_from: Option<NaiveDateTime>,
    /// Exclusive upper bound on `start_time`.
    pub starts_before: Option<NaiveDateTime>,
    pub user_id: Option<i64>,
    pub include_cancelled: bool,
}

impl Default for AppointmentQuery {
    fn default() -> Self {
        Self {
            starts_from: None,
            starts_before: None,
            user_id: None,
            include_cancelled: true,
        }
    }
}

impl AppointmentQuery {
    /// Every appointment whose start falls on a day of `range`.
    pub fn in_range(range: &ResolvedRange) -> Self {
        Self {
            starts_from: Some(range.start_datetime()),
            starts_before: Some(range.end_exclusive()),
            ..Self::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        if let Some(from) = self.starts_from {
            if appointment.start_time < from {
                return false;
            }
        }
        if let Some(before) = self.starts_before {
            if appointment.start_time >= before {
                return false;
            }
        }
        if let Some(user_id) = self.user_id {
            if appointment.user_id != user_id {
                return false;
            }
        }
        self.include_cancelled || !appointment.is_cancelled.is_yes()
    }
}
