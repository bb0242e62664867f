use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use services::activity_service::ActivityService;

/// GET /api/courses/{course_id}/activities
///
/// Lists the course's activities with their grading parameters. The course's
/// teacher (and admins) also see unpublished drafts.
pub async fn list_activities(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
    user: AuthUser,
) -> Response {
    match ActivityService::list(state.db(), &user.actor(), course_id).await {
        Ok(activities) => {
            Json(ApiResponse::success(activities, "Activities retrieved")).into_response()
        }
        Err(e) => service_error(e),
    }
}
