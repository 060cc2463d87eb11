use std::sync::Arc;

use agenda_core::date_range::DateRange;
use agenda_core::models::calendar::ApiResponse;
use agenda_core::models::dashboard::{DashboardStatistics, StatisticsQuery};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{
    handlers::calendar::{user_message, INVALID_DATA},
    middleware::auth::CurrentUser,
    services::statistics::StatisticsAggregator,
    ApiState,
};

/// Landing cards: always the current Sunday-to-Saturday week, always
/// successful.
pub async fn current_week(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
) -> Json<ApiResponse<DashboardStatistics>> {
    let range = DateRange::current_week(StatisticsAggregator::today());
    Json(ApiResponse::ok(state.dashboard().assemble(&range).await))
}

/// Statistics for an arbitrary range, degrading to zeros when the store fails.
/// Invalid ranges are rejected up front.
pub async fn statistics(
    State(state): State<Arc<ApiState>>,
    _user: CurrentUser,
    query: Result<Query<StatisticsQuery>, QueryRejection>,
) -> Json<ApiResponse<DashboardStatistics>> {
    let Ok(Query(query)) = query else {
        return Json(ApiResponse::failure(INVALID_DATA));
    };

    // Bad or unresolvable dates are the caller's fault and are reported as such.
    let range = DateRange::from_query(
        query.start_date.as_deref(),
        query.end_date.as_deref(),
        query.week_start.as_deref(),
    )
    .and_then(|range| state.statistics().resolve(&range).map(|_| range));

    match range {
        Ok(range) => Json(ApiResponse::ok(state.dashboard().get_statistics(&range).await)),
        Err(e) => Json(ApiResponse::failure(user_message(&e, INVALID_DATA))),
    }
}
