use agenda_core::date_range::{week_start_for, OUT_OF_RANGE};
use agenda_core::datetime::format_date;
use agenda_db::mock::memory::InMemoryAppointmentStore;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Local};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;

use crate::test_utils::{appointment, request, send, TestContext, OWNER_ID, OWNER_TOKEN};

fn zeroed() -> serde_json::Value {
    json!({
        "totalEvents": 0,
        "dayWithMostEvents": {"date": "Unknown", "eventCount": 0},
        "dayWithMostHours": {"date": "Unknown", "totalHours": 0.0},
        "peakOccupancy": null,
        "dailyOccupancy": []
    })
}

#[test(tokio::test)]
async fn test_dashboard_covers_current_week() {
    let monday = week_start_for(Local::now().date_naive()) + Duration::days(1);
    let day = format_date(&monday);
    let store = InMemoryAppointmentStore::with_appointments(vec![
        appointment(1, OWNER_ID, &format!("{} 09:00", day), &format!("{} 10:00", day)),
        // Previous week, not counted
        appointment(
            2,
            OWNER_ID,
            &format!("{} 09:00", format_date(&(monday - Duration::days(7)))),
            &format!("{} 10:00", format_date(&(monday - Duration::days(7)))),
        ),
    ]);

    let (status, body) = send(
        TestContext::with_store(store).into_router(),
        request(Method::GET, "/api/dashboard", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["totalEvents"], json!(1));
    assert_eq!(body["data"]["dayWithMostEvents"], json!({"date": day, "eventCount": 1}));
    assert_eq!(body["data"]["dayWithMostHours"], json!({"date": day, "totalHours": 1.0}));
    assert_eq!(body["data"]["peakOccupancy"], json!({"date": day, "occupancyPercentage": 16.67}));
    // Sunday through Saturday
    assert_eq!(body["data"]["dailyOccupancy"].as_array().unwrap().len(), 7);
}

#[test(tokio::test)]
async fn test_dashboard_degrades_when_store_fails() {
    let ctx = TestContext::new();
    ctx.store.set_failing(true);

    let (status, body) = send(
        ctx.into_router(),
        request(Method::GET, "/api/dashboard", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": zeroed()}));
}

#[test(tokio::test)]
async fn test_range_statistics_degrade_when_store_fails() {
    let ctx = TestContext::new();
    ctx.store.set_failing(true);

    let (_, body) = send(
        ctx.into_router(),
        request(
            Method::GET,
            "/api/dashboard/statistics?startDate=2024-06-03&endDate=2024-06-09",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(body, json!({"success": true, "data": zeroed()}));
}

#[test(tokio::test)]
async fn test_range_statistics_with_week_start() {
    let store = InMemoryAppointmentStore::with_appointments(vec![
        appointment(1, OWNER_ID, "2024-06-05 07:00", "2024-06-05 13:00"),
        appointment(2, OWNER_ID, "2024-06-06 09:00", "2024-06-06 10:00"),
    ]);

    let (_, body) = send(
        TestContext::with_store(store).into_router(),
        request(
            Method::GET,
            "/api/dashboard/statistics?weekStart=2024-06-02",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(body["data"]["totalEvents"], json!(2));
    assert_eq!(body["data"]["peakOccupancy"], json!({"date": "2024-06-05", "occupancyPercentage": 100.0}));
    assert_eq!(
        body["data"]["dailyOccupancy"][0],
        json!({"date": "2024-06-02", "occupancyPercentage": 0.0})
    );
}

#[test(tokio::test)]
async fn test_range_statistics_reject_bad_dates() {
    let (_, body) = send(
        TestContext::new().into_router(),
        request(Method::GET, "/api/dashboard/statistics?endDate=soon", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid date 'soon'. Expected yyyy-MM-dd"));
}

#[test(tokio::test)]
async fn test_range_statistics_reject_dates_at_the_calendar_edge() {
    let (status, body) = send(
        TestContext::new().into_router(),
        request(
            Method::GET,
            "/api/dashboard/statistics?startDate=%2B262142-12-31",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": OUT_OF_RANGE}));
}

#[test(tokio::test)]
async fn test_range_statistics_reject_long_ranges() {
    let (_, body) = send(
        TestContext::new().into_router(),
        request(
            Method::GET,
            "/api/dashboard/statistics?startDate=2024-01-01&endDate=2025-06-30",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Date range of 547 days exceeds the maximum of 366 days"));
}

#[test(tokio::test)]
async fn test_dashboard_requires_session() {
    let (status, _) = send(
        TestContext::new().into_router(),
        request(Method::GET, "/api/dashboard", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

