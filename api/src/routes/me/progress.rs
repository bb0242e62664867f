use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use services::progress_service::ProgressService;

/// GET /api/me/progress
///
/// ```json
/// {
///   "success": true,
///   "data": [
///     { "courseId": 1, "courseTitle": "Academic Writing", "total": 3, "passed": 2, "percentage": 67 }
///   ],
///   "message": "Progress retrieved"
/// }
/// ```
pub async fn get_my_progress(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Response {
    match ProgressService::for_student(state.db(), claims.sub).await {
        Ok(progress) => Json(ApiResponse::success(progress, "Progress retrieved")).into_response(),
        Err(e) => service_error(e),
    }
}
