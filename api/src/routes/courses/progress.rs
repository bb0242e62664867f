use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use services::progress_service::ProgressService;

/// GET /api/courses/{course_id}/progress
///
/// The calling student's progress in one course.
///
/// ```json
/// { "success": true, "data": { "total": 2, "passed": 1, "percentage": 50 }, "message": "Progress retrieved" }
/// ```
pub async fn my_course_progress(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    AuthUser(claims): AuthUser,
) -> Response {
    match ProgressService::for_course(state.db(), claims.sub, course_id).await {
        Ok(progress) => Json(ApiResponse::success(progress, "Progress retrieved")).into_response(),
        Err(e) => service_error(e),
    }
}

/// GET /api/courses/{course_id}/students/{student_id}/progress
///
/// A teacher's view of one enrolled student.
pub async fn student_course_progress(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(i64, i64)>,
    user: AuthUser,
) -> Response {
    match ProgressService::for_student_as_teacher(state.db(), &user.actor(), course_id, student_id)
        .await
    {
        Ok(progress) => Json(ApiResponse::success(progress, "Progress retrieved")).into_response(),
        Err(e) => service_error(e),
    }
}
