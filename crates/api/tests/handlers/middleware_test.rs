use agenda_api::middleware::{auth, error_handling::map_error};
use agenda_core::errors::AgendaError;
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue, StatusCode};
use pretty_assertions::{assert_eq, assert_ne};
use rstest::rstest;

use crate::test_utils::error_text;

#[rstest]
#[case::not_found(AgendaError::NotFound("Appointment 7".into()), StatusCode::NOT_FOUND)]
#[case::validation(AgendaError::validation("Title is required"), StatusCode::BAD_REQUEST)]
#[case::authentication(AgendaError::Authentication("Missing session token".into()), StatusCode::UNAUTHORIZED)]
#[case::authorization(AgendaError::Authorization("Not your appointment".into()), StatusCode::FORBIDDEN)]
#[case::database(AgendaError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case::internal(
    AgendaError::Internal(Box::new(std::io::Error::other("disk full"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: AgendaError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_validation_message_reaches_client() {
    let body = error_text(map_error(AgendaError::validation("Title is required"))).await;
    assert_eq!(body, "Validation error: Title is required");
}

#[tokio::test]
async fn test_storage_details_are_hidden() {
    // Connection strings must not leak into responses
    let body = error_text(map_error(AgendaError::Database(eyre::eyre!(
        "password authentication failed for postgres://agenda:secret@db"
    ))))
    .await;
    assert_eq!(body, "Internal server error");
}

#[test]
fn test_hash_and_verify_password() {
    let hashed = auth::hash_password("correct horse").unwrap();

    assert_ne!(hashed, "correct horse");
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_password("correct horse", &hashed).unwrap());
    assert!(!auth::verify_password("wrong horse", &hashed).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let first = auth::hash_password("same").unwrap();
    let second = auth::hash_password("same").unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_verify_against_garbage_hash_is_error() {
    assert!(auth::verify_password("anything", "not-a-phc-string").is_err());
}

#[test]
fn test_generated_codes() {
    let code = auth::generate_numeric_code(6);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let reset = auth::generate_reset_token();
    assert_eq!(reset.len(), 40);
    assert!(reset.chars().all(|c| c.is_ascii_alphanumeric()));

    let session = auth::generate_session_token();
    assert_eq!(session.len(), 64);
    assert_ne!(session, auth::generate_session_token());
}

#[rstest]
#[case::bearer(Some("Bearer abc123"), Some("abc123"))]
#[case::lowercase_scheme(Some("bearer abc123"), Some("abc123"))]
#[case::padded(Some("Bearer   abc123  "), Some("abc123"))]
#[case::basic(Some("Basic dXNlcjpwYXNz"), None)]
#[case::no_token(Some("Bearer "), None)]
#[case::scheme_only(Some("Bearer"), None)]
#[case::missing(None, None)]
fn test_bearer_token(#[case] header: Option<&str>, #[case] expected: Option<&str>) {
    let mut headers = HeaderMap::new();
    if let Some(header) = header {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(header).unwrap());
    }

    assert_eq!(auth::bearer_token(&headers), expected);
}

#[tokio::test]
async fn test_health_and_version_are_public() {
    let (status, body) = crate::test_utils::send(
        crate::test_utils::TestContext::new().into_router(),
        crate::test_utils::request(axum::http::Method::GET, "/health", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_, body) = crate::test_utils::send(
        crate::test_utils::TestContext::new().into_router(),
        crate::test_utils::request(axum::http::Method::GET, "/version", None, None),
    )
    .await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
