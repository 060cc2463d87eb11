use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/calendar/events",
            get(handlers::calendar::list_events)
                .post(handlers::calendar::create_event)
                .put(handlers::calendar::update_event)
                .delete(handlers::calendar::delete_event),
        )
        .route("/api/calendar/statistics", get(handlers::calendar::get_statistics))
}
