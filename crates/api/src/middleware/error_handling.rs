//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies.
//!
//! Only the session extractor and the auth endpoints surface these responses;
//! calendar endpoints always answer with their own `{success, message}`
//! envelope.

use agenda_core::errors::AgendaError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use agenda_api::middleware::error_handling::AppError;
/// use agenda_core::errors::AgendaError;
///
/// async fn handler(id: i64) -> Result<Json<i64>, AppError> {
///     if id <= 0 {
///         return Err(AppError(AgendaError::NotFound(format!("Appointment {} not found", id))));
///     }
///     Ok(Json(id))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub AgendaError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AgendaError::NotFound(_) => StatusCode::NOT_FOUND,
            AgendaError::Validation(_) => StatusCode::BAD_REQUEST,
            AgendaError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AgendaError::Authorization(_) => StatusCode::FORBIDDEN,
            AgendaError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AgendaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the log
        let message = match &self.0 {
            AgendaError::Database(_) | AgendaError::Internal(_) => {
                tracing::error!("Request failed: {:?}", self.0);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        AppError(err)
    }
}

/// Wraps the eyre error in an `AgendaError::Database` variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(AgendaError::Database(err))
    }
}

/// Malformed JSON bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(AgendaError::Validation(rejection.body_text()))
    }
}

/// Maps an AgendaError to an HTTP response
pub fn map_error(err: AgendaError) -> Response {
    AppError(err).into_response()
}
