//! Translation between stored appointments and calendar events.
//!
//! Store writes return only an id or a flag, so every create and update is
//! followed by a read of the same record; the event handed back to the
//! caller is always the materialized row, never an echo of the input.

use std::sync::Arc;

use agenda_core::datetime::{parse_event_datetime, parse_query_date};
use agenda_core::errors::{AgendaError, AgendaResult};
use agenda_core::models::appointment::{AppointmentQuery, AppointmentUpdate, NewAppointment, YesNo};
use agenda_core::models::auth::SessionUser;
use agenda_core::models::calendar::{CalendarEvent, CreateEventRequest, EventFilter, UpdateEventRequest};
use agenda_db::AppointmentStore;
use chrono::{NaiveDateTime, NaiveTime};
use tracing::{error, warn};

/// Description stored when a new event is created without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Required fields of a create or update, after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTimes {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

fn validate_fields(title: &str, start: &str, end: &str) -> AgendaResult<EventTimes> {
    if title.trim().is_empty() {
        return Err(AgendaError::validation("Title is required"));
    }
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(AgendaError::validation("Start and end times are required"));
    }

    let start = parse_event_datetime(start)?;
    let end = parse_event_datetime(end)?;
    if start >= end {
        return Err(AgendaError::validation("Start time must be before end time"));
    }

    Ok(EventTimes { start, end })
}

pub fn validate_create(input: &CreateEventRequest) -> AgendaResult<EventTimes> {
    validate_fields(&input.title, &input.start, &input.end)
}

pub fn validate_update(input: &UpdateEventRequest) -> AgendaResult<EventTimes> {
    if input.id <= 0 {
        return Err(AgendaError::validation("Event id is required"));
    }
    validate_fields(&input.title, &input.start, &input.end)
}

/// Builds the store query for a listing request.
///
/// `start` is an inclusive lower bound on the event start. `end` is the
/// widget's exclusive bound; a bare date means midnight of that day.
pub fn query_for(filter: &EventFilter, user: &SessionUser) -> AgendaResult<AppointmentQuery> {
    let non_empty = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let starts_from = match non_empty(&filter.start) {
        Some(start) => Some(parse_query_date(&start)?.and_time(NaiveTime::MIN)),
        None => None,
    };
    let starts_before = match non_empty(&filter.end) {
        Some(end) => Some(parse_event_datetime(&end)?),
        None => None,
    };

    Ok(AppointmentQuery {
        starts_from,
        starts_before,
        user_id: filter.mine.then_some(user.user_id),
        include_cancelled: filter.include_cancelled.unwrap_or(true),
    })
}

/// Calendar operations over the appointment store.
///
/// Every operation is best-effort: failures are logged and reported as an
/// empty list, `None`, or `false`.
#[derive(Clone)]
pub struct CalendarEvents {
    store: Arc<dyn AppointmentStore>,
}

impl CalendarEvents {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }

    pub async fn list_events(&self, query: &AppointmentQuery) -> Vec<CalendarEvent> {
        match self.store.list(query).await {
            Ok(appointments) => appointments.iter().map(CalendarEvent::from).collect(),
            Err(e) => {
                error!("Error fetching calendar events: {:?}", e);
                Vec::new()
            }
        }
    }

    /// Books an appointment for `user` and returns it as stored.
    ///
    /// New events are unconfirmed with a reminder; a missing description is
    /// stored as [`DEFAULT_DESCRIPTION`].
    pub async fn create_event(&self, input: &CreateEventRequest, user: &SessionUser) -> Option<CalendarEvent> {
        let times = match validate_create(input) {
            Ok(times) => times,
            Err(e) => {
                warn!("Rejected calendar event: {}", e);
                return None;
            }
        };

        let new = NewAppointment {
            title: input.title.trim().to_string(),
            description: Some(
                input
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            ),
            start_time: times.start,
            end_time: times.end,
            location: input.location.clone(),
            is_confirmed: YesNo::No,
            send_reminder: YesNo::Yes,
            user_id: user.user_id,
            user_email: user.email.clone(),
        };

        let id = match self.store.create(&new).await {
            Ok(id) if id > 0 => id,
            Ok(id) => {
                error!("Store returned invalid id {} for new appointment", id);
                return None;
            }
            Err(e) => {
                error!("Error creating calendar event: {:?}", e);
                return None;
            }
        };

        self.read_back(id).await
    }

    /// Rewrites title, times, description and location of an existing event.
    ///
    /// Omitted description or location keep their stored values; the
    /// confirmation, cancellation, meeting link and reminder fields are never
    /// touched from here.
    pub async fn update_event(&self, input: &UpdateEventRequest) -> Option<CalendarEvent> {
        let times = match validate_update(input) {
            Ok(times) => times,
            Err(e) => {
                warn!("Rejected calendar event update: {}", e);
                return None;
            }
        };

        let current = match self.store.get(input.id).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                warn!("Appointment {} not found for update", input.id);
                return None;
            }
            Err(e) => {
                error!("Error loading appointment {}: {:?}", input.id, e);
                return None;
            }
        };

        let update = AppointmentUpdate {
            title: input.title.trim().to_string(),
            description: input.description.clone().or(current.description),
            start_time: times.start,
            end_time: times.end,
            location: input.location.clone().or(current.location),
            is_confirmed: current.is_confirmed,
            is_cancelled: current.is_cancelled,
            cancellation_reason: current.cancellation_reason,
            meeting_link: current.meeting_link,
            send_reminder: current.send_reminder,
        };

        match self.store.update(input.id, &update).await {
            Ok(true) => self.read_back(input.id).await,
            Ok(false) => {
                warn!("Appointment {} vanished before update", input.id);
                None
            }
            Err(e) => {
                error!("Error updating calendar event {}: {:?}", input.id, e);
                None
            }
        }
    }

    /// Deletes an event owned by `user`. Returns true only when a row was
    /// removed.
    pub async fn delete_event(&self, id: i64, user: &SessionUser) -> bool {
        match self.store.get(id).await {
            Ok(Some(existing)) if existing.user_id != user.user_id => {
                warn!(
                    appointment_id = id,
                    user_id = user.user_id,
                    "Refusing to delete an appointment owned by another user"
                );
                return false;
            }
            Ok(Some(_)) => {}
            Ok(None) => return false,
            Err(e) => {
                error!("Error loading appointment {}: {:?}", id, e);
                return false;
            }
        }

        match self.store.delete(id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!("Error deleting calendar event {}: {:?}", id, e);
                false
            }
        }
    }

    async fn read_back(&self, id: i64) -> Option<CalendarEvent> {
        match self.store.get(id).await {
            Ok(Some(stored)) => Some(CalendarEvent::from(&stored)),
            Ok(None) => {
                error!("Appointment {} missing right after write", id);
                None
            }
            Err(e) => {
                error!("Error reading appointment {}: {:?}", id, e);
                None
            }
        }
    }
}

