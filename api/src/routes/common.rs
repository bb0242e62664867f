//! Helpers shared by the route handlers.

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::ServiceError;
use tracing::{error, warn};
use validator::ValidationErrors;

/// Joins every field message of a failed validation into one line. Errors inside
/// nested values (such as one of several attached files) only carry a generic note.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ");

    if message.is_empty() {
        "Invalid request body".to_owned()
    } else {
        message
    }
}

pub fn validation_error(errors: &ValidationErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::<Empty>::error(format_validation_errors(errors))),
    )
        .into_response()
}

/// Keeps malformed or mistyped JSON bodies inside the response envelope instead of
/// axum's plain-text rejection.
pub fn json_rejection(rejection: JsonRejection) -> Response {
    warn!(status = rejection.status().as_u16(), "Rejected request body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ApiResponse::<Empty>::error(rejection.body_text())),
    )
        .into_response()
}

/// Turns an engine error into the response envelope.
///
/// Database failures are logged with their cause and reach the caller only as a
/// generic message.
pub fn service_error(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &err {
        ServiceError::Database(cause) => error!(error = %cause, "Database error"),
        other => warn!(kind = other.kind(), status = status.as_u16(), "{other}"),
    }

    (status, Json(ApiResponse::<Empty>::error(err.to_string()))).into_response()
}
