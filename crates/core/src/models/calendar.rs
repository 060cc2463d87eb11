use serde::{Deserialize, Serialize};

use crate::datetime::format_event_datetime;
use crate::models::appointment::Appointment;

/// Wire projection of an appointment for the calendar widget.
///
/// Recomputed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_confirmed: bool,
    pub is_cancelled: bool,
    pub email: Option<String>,
}

impl From<&Appointment> for CalendarEvent {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            title: appointment.title.clone(),
            start: format_event_datetime(&appointment.start_time),
            end: format_event_datetime(&appointment.end_time),
            description: appointment.description.clone(),
            location: appointment.location.clone(),
            is_confirmed: appointment.is_confirmed.is_yes(),
            is_cancelled: appointment.is_cancelled.is_yes(),
            email: Some(appointment.user_email.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    pub location: Option<String>,
}

/// Query string accepted by the event listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub mine: bool,
    pub include_cancelled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEventQuery {
    pub id: i64,
}

/// `{success, data?, message?}` envelope returned by every calendar endpoint.
///
/// Failures are reported through `success: false` with a 200 status, so
/// clients branch on the flag rather than on the transport status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
        }
    }
}
