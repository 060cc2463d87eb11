use agenda_core::date_range::OUT_OF_RANGE;
use agenda_core::models::appointment::YesNo;
use agenda_db::mock::memory::InMemoryAppointmentStore;
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use test_log::test;

use crate::test_utils::{
    appointment, dt, request, send, TestContext, OTHER_TOKEN, OWNER_ID, OWNER_TOKEN,
};

const EVENTS: &str = "/api/calendar/events";

#[test(tokio::test)]
async fn test_create_then_fetch_returns_stored_event() {
    let ctx = TestContext::new();
    let store = ctx.store.clone();
    let router = ctx.into_router();

    let (status, body) = send(
        router.clone(),
        request(
            Method::POST,
            EVENTS,
            Some(OWNER_TOKEN),
            Some(json!({
                "title": "Dentist",
                "start": "2024-06-03T09:00",
                "end": "2024-06-03T10:30",
                "location": "Room 2"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, listed) = send(
        router,
        request(
            Method::GET,
            "/api/calendar/events?start=2024-06-03&end=2024-06-04",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    // The listing reflects what the store holds, including defaults
    assert_eq!(
        listed,
        json!({
            "success": true,
            "data": [{
                "id": id,
                "title": "Dentist",
                "start": "2024-06-03 09:00",
                "end": "2024-06-03 10:30",
                "description": "No description",
                "location": "Room 2",
                "isConfirmed": false,
                "isCancelled": false,
                "email": "user1@agenda.test"
            }]
        })
    );

    let stored = store.snapshot().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, OWNER_ID);
    assert_eq!(stored[0].send_reminder, YesNo::Yes);
}

#[rstest]
#[case::missing_title(json!({"title": " ", "start": "2024-06-03T09:00", "end": "2024-06-03T10:00"}), "Title is required")]
#[case::missing_end(json!({"title": "Dentist", "start": "2024-06-03T09:00"}), "Start and end times are required")]
#[case::inverted(json!({"title": "Dentist", "start": "2024-06-03T10:00", "end": "2024-06-03T09:00"}), "Start time must be before end time")]
#[case::equal(json!({"title": "Dentist", "start": "2024-06-03T10:00", "end": "2024-06-03 10:00"}), "Start time must be before end time")]
#[tokio::test]
async fn test_create_rejects_invalid_input(#[case] payload: Value, #[case] message: &str) {
    let ctx = TestContext::new();
    let store = ctx.store.clone();

    let (status, body) = send(
        ctx.into_router(),
        request(Method::POST, EVENTS, Some(OWNER_TOKEN), Some(payload)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": message}));
    assert!(store.snapshot().await.is_empty());
}

#[test(tokio::test)]
async fn test_create_with_malformed_json_reports_invalid_data() {
    let ctx = TestContext::new();

    let (status, body) = send(
        ctx.into_router(),
        request(Method::POST, EVENTS, Some(OWNER_TOKEN), Some(json!(["not", "an", "object"]))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Invalid data provided"}));
}

#[test(tokio::test)]
async fn test_create_when_store_fails() {
    let ctx = TestContext::new();
    ctx.store.set_failing(true);

    let (_, body) = send(
        ctx.into_router(),
        request(
            Method::POST,
            EVENTS,
            Some(OWNER_TOKEN),
            Some(json!({"title": "Dentist", "start": "2024-06-03T09:00", "end": "2024-06-03T10:00"})),
        ),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Error creating event"}));
}

#[test(tokio::test)]
async fn test_list_filters_by_range_owner_and_cancellation() {
    let mut cancelled = appointment(3, OWNER_ID, "2024-06-04 09:00", "2024-06-04 10:00");
    cancelled.is_cancelled = YesNo::Yes;
    let store = InMemoryAppointmentStore::with_appointments(vec![
        appointment(1, OWNER_ID, "2024-06-03 09:00", "2024-06-03 10:00"),
        appointment(2, 2, "2024-06-03 11:00", "2024-06-03 12:00"),
        cancelled,
        // Outside the requested week
        appointment(4, OWNER_ID, "2024-06-10 09:00", "2024-06-10 10:00"),
    ]);
    let router = TestContext::with_store(store).into_router();

    let ids = |body: &Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|event| event["id"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, all) = send(
        router.clone(),
        request(Method::GET, "/api/calendar/events?start=2024-06-02&end=2024-06-09", Some(OWNER_TOKEN), None),
    )
    .await;
    assert_eq!(ids(&all), vec!["1", "2", "3"]);

    let (_, mine) = send(
        router.clone(),
        request(
            Method::GET,
            "/api/calendar/events?start=2024-06-02&end=2024-06-09&mine=true",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(ids(&mine), vec!["1", "3"]);

    let (_, active) = send(
        router,
        request(
            Method::GET,
            "/api/calendar/events?start=2024-06-02&end=2024-06-09&includeCancelled=false",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;
    assert_eq!(ids(&active), vec!["1", "2"]);
}

#[test(tokio::test)]
async fn test_list_when_store_fails_is_empty_success() {
    let ctx = TestContext::new();
    ctx.store.set_failing(true);

    let (_, body) = send(ctx.into_router(), request(Method::GET, EVENTS, Some(OWNER_TOKEN), None)).await;

    assert_eq!(body, json!({"success": true, "data": []}));
}

#[test(tokio::test)]
async fn test_list_with_unparseable_start() {
    let ctx = TestContext::new();

    let (_, body) = send(
        ctx.into_router(),
        request(Method::GET, "/api/calendar/events?start=yesterday", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid date 'yesterday'. Expected yyyy-MM-dd"));
}

#[test(tokio::test)]
async fn test_update_location_only_keeps_other_fields() {
    let mut existing = appointment(5, OWNER_ID, "2024-06-03 09:00", "2024-06-03 10:00");
    existing.is_confirmed = YesNo::Yes;
    existing.meeting_link = Some("https://meet.example/abc".to_string());
    let ctx = TestContext::with_store(InMemoryAppointmentStore::with_appointments(vec![existing]));
    let store = ctx.store.clone();

    let (status, body) = send(
        ctx.into_router(),
        request(
            Method::PUT,
            EVENTS,
            Some(OWNER_TOKEN),
            Some(json!({
                "id": 5,
                "title": "Appointment 5",
                "start": "2024-06-03 09:00",
                "end": "2024-06-03 10:00",
                "location": "Room 9"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let stored = store.snapshot().await;
    assert_eq!(stored[0].location.as_deref(), Some("Room 9"));
    assert_eq!(stored[0].description.as_deref(), Some("Check-up"));
    assert_eq!(stored[0].is_confirmed, YesNo::Yes);
    assert_eq!(stored[0].meeting_link.as_deref(), Some("https://meet.example/abc"));
    assert_eq!(stored[0].start_time, dt("2024-06-03 09:00"));
}

#[test(tokio::test)]
async fn test_update_unknown_event() {
    let ctx = TestContext::new();

    let (_, body) = send(
        ctx.into_router(),
        request(
            Method::PUT,
            EVENTS,
            Some(OWNER_TOKEN),
            Some(json!({"id": 42, "title": "Ghost", "start": "2024-06-03T09:00", "end": "2024-06-03T10:00"})),
        ),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Error updating event"}));
}

#[test(tokio::test)]
async fn test_update_without_id() {
    let ctx = TestContext::new();

    let (_, body) = send(
        ctx.into_router(),
        request(
            Method::PUT,
            EVENTS,
            Some(OWNER_TOKEN),
            Some(json!({"id": 0, "title": "Ghost", "start": "2024-06-03T09:00", "end": "2024-06-03T10:00"})),
        ),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Event id is required"}));
}

#[test(tokio::test)]
async fn test_delete_own_event() {
    let ctx = TestContext::with_store(InMemoryAppointmentStore::with_appointments(vec![appointment(
        7,
        OWNER_ID,
        "2024-06-03 09:00",
        "2024-06-03 10:00",
    )]));
    let store = ctx.store.clone();

    let (_, body) = send(
        ctx.into_router(),
        request(Method::DELETE, "/api/calendar/events?id=7", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body, json!({"success": true}));
    assert!(store.snapshot().await.is_empty());
}

#[test(tokio::test)]
async fn test_delete_unknown_event() {
    let ctx = TestContext::new();

    let (_, body) = send(
        ctx.into_router(),
        request(Method::DELETE, "/api/calendar/events?id=99", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Error deleting event"}));
}

#[test(tokio::test)]
async fn test_delete_someone_elses_event_is_refused() {
    let ctx = TestContext::with_store(InMemoryAppointmentStore::with_appointments(vec![appointment(
        7,
        OWNER_ID,
        "2024-06-03 09:00",
        "2024-06-03 10:00",
    )]));
    let store = ctx.store.clone();

    let (_, body) = send(
        ctx.into_router(),
        request(Method::DELETE, "/api/calendar/events?id=7", Some(OTHER_TOKEN), None),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(store.snapshot().await.len(), 1);
}

#[test(tokio::test)]
async fn test_delete_without_id() {
    let ctx = TestContext::new();

    let (_, body) = send(
        ctx.into_router(),
        request(Method::DELETE, "/api/calendar/events?id=abc", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Invalid data provided"}));
}

#[test(tokio::test)]
async fn test_statistics_for_explicit_range() {
    // Monday 2024-06-03: 2.5 of 6 business hours booked
    let store = InMemoryAppointmentStore::with_appointments(vec![
        appointment(1, OWNER_ID, "2024-06-03 07:00", "2024-06-03 08:00"),
        appointment(2, OWNER_ID, "2024-06-03 09:00", "2024-06-03 10:30"),
        appointment(3, OWNER_ID, "2024-06-04 09:00", "2024-06-04 10:00"),
    ]);
    let router = TestContext::with_store(store).into_router();

    let (status, body) = send(
        router,
        request(
            Method::GET,
            "/api/calendar/statistics?startDate=2024-06-03&endDate=2024-06-04",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["totalEvents"], json!(3));
    assert_eq!(body["data"]["dayWithMostEvents"], json!({"date": "2024-06-03", "eventCount": 2}));
    assert_eq!(body["data"]["dayWithMostHours"], json!({"date": "2024-06-03", "totalHours": 2.5}));
    assert_eq!(
        body["data"]["dailyOccupancy"],
        json!([
            {"date": "2024-06-03", "occupancyPercentage": 41.67},
            {"date": "2024-06-04", "occupancyPercentage": 16.67}
        ])
    );
}

#[test(tokio::test)]
async fn test_statistics_for_empty_range() {
    let router = TestContext::new().into_router();

    let (_, body) = send(
        router,
        request(
            Method::GET,
            "/api/calendar/statistics?startDate=2024-06-03&endDate=2024-06-03",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(body["data"]["totalEvents"], json!(0));
    assert_eq!(body["data"]["dayWithMostEvents"], json!({"date": "Unknown", "eventCount": 0}));
}

#[test(tokio::test)]
async fn test_statistics_with_invalid_date() {
    let router = TestContext::new().into_router();

    let (_, body) = send(
        router,
        request(Method::GET, "/api/calendar/statistics?startDate=06/03/2024x", Some(OWNER_TOKEN), None),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid date '06/03/2024x'. Expected yyyy-MM-dd"));
}

#[test(tokio::test)]
async fn test_statistics_range_too_long() {
    let (_, body) = send(
        TestContext::new().into_router(),
        request(
            Method::GET,
            "/api/calendar/statistics?startDate=2024-01-01&endDate=2025-06-30",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(
        body,
        json!({"success": false, "message": "Date range of 547 days exceeds the maximum of 366 days"})
    );
}

#[test(tokio::test)]
async fn test_statistics_when_store_fails() {
    let ctx = TestContext::new();
    ctx.store.set_failing(true);

    let (_, body) = send(
        ctx.into_router(),
        request(
            Method::GET,
            "/api/calendar/statistics?startDate=2024-06-03&endDate=2024-06-09",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(body, json!({"success": false, "message": "Error fetching statistics"}));
}

#[rstest]
#[case::start_on_last_day("startDate=%2B262142-12-31")]
#[case::ends_on_last_day("startDate=%2B262142-12-25&endDate=%2B262142-12-31")]
#[case::week_on_last_day("weekStart=%2B262142-12-30")]
#[tokio::test]
async fn test_statistics_at_the_calendar_edge(#[case] query: &str) {
    let (status, body) = send(
        TestContext::new().into_router(),
        request(
            Method::GET,
            &format!("/api/calendar/statistics?{}", query),
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": OUT_OF_RANGE}));
}

#[test(tokio::test)]
async fn test_statistics_total_matches_listed_events() {
    let mut cancelled = appointment(4, 2, "2024-06-05 11:00", "2024-06-05 12:00");
    cancelled.is_cancelled = YesNo::Yes;
    let store = InMemoryAppointmentStore::with_appointments(vec![
        // Just before the window
        appointment(1, OWNER_ID, "2024-06-02 23:30", "2024-06-03 00:30"),
        appointment(2, OWNER_ID, "2024-06-03 00:00", "2024-06-03 01:00"),
        appointment(3, OWNER_ID, "2024-06-05 09:00", "2024-06-05 10:00"),
        cancelled,
        appointment(5, 2, "2024-06-09 23:30", "2024-06-10 00:30"),
        // Midnight after the last day
        appointment(6, OWNER_ID, "2024-06-10 00:00", "2024-06-10 01:00"),
    ]);
    let router = TestContext::with_store(store).into_router();

    // The calendar lists with an exclusive end and asks for statistics up to
    // the day before it.
    let (_, listed) = send(
        router.clone(),
        request(
            Method::GET,
            "/api/calendar/events?start=2024-06-03&end=2024-06-10",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;
    let (_, stats) = send(
        router,
        request(
            Method::GET,
            "/api/calendar/statistics?startDate=2024-06-03&endDate=2024-06-09",
            Some(OWNER_TOKEN),
            None,
        ),
    )
    .await;

    let listed = listed["data"].as_array().unwrap();
    let ids: Vec<&str> = listed.iter().map(|event| event["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["2", "3", "4", "5"]);
    assert_eq!(stats["data"]["totalEvents"], json!(listed.len()));
}

#[rstest]
#[case::list(Method::GET, EVENTS)]
#[case::delete(Method::DELETE, "/api/calendar/events?id=1")]
#[case::statistics(Method::GET, "/api/calendar/statistics")]
#[tokio::test]
async fn test_calendar_requires_session(#[case] method: Method, #[case] uri: &str) {
    let (status, body) = send(TestContext::new().into_router(), request(method.clone(), uri, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Authentication error: Missing session token"}));

    let (status, _) = send(TestContext::new().into_router(), request(method, uri, Some("stale"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
