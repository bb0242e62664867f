//! Enrollment endpoints. The student is always the caller named in the token.

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::enrollment_service::EnrollmentService;

#[derive(Debug, Serialize)]
pub struct EnrollmentStatusResponse {
    pub enrolled: bool,
}

/// POST /api/courses/{course_id}/enrollment
///
/// Creates an ACTIVE enrollment for the calling student.
///
/// ### Responses
/// - `201 Created` with the enrollment
/// - `404 Not Found` if the course does not exist
/// - `409 Conflict` if the student already holds an ACTIVE enrollment
pub async fn enroll(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    AuthUser(claims): AuthUser,
) -> Response {
    match EnrollmentService::enroll(state.db(), claims.sub, course_id).await {
        Ok(enrollment) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(enrollment, "Enrolled successfully")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /api/courses/{course_id}/enrollment
///
/// ```json
/// { "success": true, "data": { "enrolled": true }, "message": "Enrollment status retrieved" }
/// ```
pub async fn enrollment_status(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    AuthUser(claims): AuthUser,
) -> Response {
    match EnrollmentService::is_enrolled(state.db(), claims.sub, course_id).await {
        Ok(enrolled) => Json(ApiResponse::success(
            EnrollmentStatusResponse { enrolled },
            "Enrollment status retrieved",
        ))
        .into_response(),
        Err(e) => service_error(e),
    }
}

/// DELETE /api/courses/{course_id}/enrollment
///
/// Cancels the caller's ACTIVE enrollment. The row is kept with status
/// `cancelled`; enrolling again starts a new one.
///
/// ### Responses
/// - `200 OK` with the cancelled enrollment
/// - `404 Not Found` if there is no ACTIVE enrollment
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    AuthUser(claims): AuthUser,
) -> Response {
    match EnrollmentService::cancel(state.db(), claims.sub, course_id).await {
        Ok(enrollment) => {
            Json(ApiResponse::success(enrollment, "Enrollment cancelled")).into_response()
        }
        Err(e) => service_error(e),
    }
}
