use std::sync::Arc;

use agenda_core::date_range::DateRange;
use agenda_core::errors::AgendaError;
use agenda_core::models::calendar::{
    ApiResponse, CalendarEvent, CreateEventRequest, CreatedEvent, DeleteEventQuery, EventFilter,
    UpdateEventRequest,
};
use agenda_core::models::dashboard::{DashboardStatistics, StatisticsQuery};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use tracing::{error, info, warn};

use crate::{
    middleware::auth::CurrentUser,
    services::calendar::{query_for, validate_create, validate_update},
    ApiState,
};

pub const INVALID_DATA: &str = "Invalid data provided";

/// Text shown to the user for a rejected request. Only validation messages
/// are passed through verbatim.
pub(crate) fn user_message(err: &AgendaError, fallback: &str) -> String {
    match err {
        AgendaError::Validation(message) => message.clone(),
        _ => fallback.to_string(),
    }
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    CurrentUser { user, .. }: CurrentUser,
    filter: Result<Query<EventFilter>, QueryRejection>,
) -> Json<ApiResponse<Vec<CalendarEvent>>> {
    let Ok(Query(filter)) = filter else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    let query = match query_for(&filter, &user) {
        Ok(query) => query,
        Err(e) => return Json(ApiResponse::failure(user_message(&e, "Error fetching events"))),
    };

    let events = state.calendar().list_events(&query).await;
    Json(ApiResponse::ok(events))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    CurrentUser { user, .. }: CurrentUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Json<ApiResponse<CreatedEvent>> {
    let Ok(Json(payload)) = payload else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    if let Err(e) = validate_create(&payload) {
        return Json(ApiResponse::failure(user_message(&e, INVALID_DATA)));
    }

    match state.calendar().create_event(&payload, &user).await {
        Some(event) => {
            info!(event_id = %event.id, user_id = user.user_id, "Calendar event created");
            Json(ApiResponse::ok(CreatedEvent { id: event.id }))
        }
        None => Json(ApiResponse::failure("Error creating event")),
    }
}

pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    CurrentUser { user, .. }: CurrentUser,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Json<ApiResponse<()>> {
    let Ok(Json(payload)) = payload else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    if let Err(e) = validate_update(&payload) {
        return Json(ApiResponse::failure(user_message(&e, INVALID_DATA)));
    }

    match state.calendar().update_event(&payload).await {
        Some(event) => {
            info!(event_id = %event.id, user_id = user.user_id, "Calendar event updated");
            Json(ApiResponse::done())
        }
        None => Json(ApiResponse::failure("Error updating event")),
    }
}

pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    CurrentUser { user, .. }: CurrentUser,
    query: Result<Query<DeleteEventQuery>, QueryRejection>,
) -> Json<ApiResponse<()>> {
    let Ok(Query(DeleteEventQuery { id })) = query else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    if state.calendar().delete_event(id, &user).await {
        info!(event_id = id, user_id = user.user_id, "Calendar event deleted");
        Json(ApiResponse::done())
    } else {
        Json(ApiResponse::failure("Error deleting event"))
    }
}

/// Statistics for the range the calendar is showing.
///
/// Unlike the dashboard, a store failure is reported to the caller instead of
/// being rendered as zeros.
#[axum::debug_handler]
pub async fn get_statistics(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> Json<ApiResponse<DashboardStatistics>> {
    let Ok(Query(query)) = query else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    info!(
        start_date = ?query.start_date,
        end_date = ?query.end_date,
        week_start = ?query.week_start,
        "Statistics requested"
    );

    let range = match DateRange::from_query(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.week_start.as_deref(),
    ) {
        Ok(range) => range,
        Err(e) => {
            warn!("Rejected statistics range: {}", e);
            return Json(ApiResponse::failure(user_message(&e, INVALID_DATA)));
        }
    };

    match state.statistics().compute(&range).await {
        Ok(stats) => Json(ApiResponse::ok(stats.into())),
        Err(AgendaError::Validation(message)) => Json(ApiResponse::failure(message)),
        Err(e) => {
            error!("Error fetching dashboard statistics for calendar: {:?}", e);
            Json(ApiResponse::failure("Error fetching statistics"))
        }
    }
}
