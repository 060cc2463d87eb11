use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/dashboard", get(handlers::dashboard::current_week))
        .route("/api/dashboard/statistics", get(handlers::dashboard::statistics))
}
