//! Multipart upload of submission files.
//!
//! Files are stored before the submission that references them exists, so the
//! caller's eligibility to submit is checked first. Either every part is stored
//! or none is.

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::{
    ServiceError,
    storage::{UploadPart, store_all},
    submission_service::SubmissionService,
};
use util::{config::AppConfig, paths::upload_key};

pub const MAX_UPLOAD_FILES: usize = 10;

/// POST /api/courses/{course_id}/activities/{activity_id}/uploads
///
/// Accepts `multipart/form-data` with one or more file parts (any field name).
/// Returns the metadata to pass as `files` when submitting.
///
/// ### Responses
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": [
///     { "name": "essay.pdf", "url": "/files/course_1/activity_2/student_3/1f0c..._essay.pdf",
///       "mimeType": "application/pdf", "sizeBytes": 20480 }
///   ],
///   "message": "Files uploaded"
/// }
/// ```
/// - `400 Bad Request` if no file was sent, a file is empty or too large, or storage fails
/// - `403 Forbidden` if the caller is not enrolled
/// - `404 Not Found` if the activity is unknown or unpublished
/// - `409 Conflict` if no attempts remain or the window has closed
pub async fn upload_files(
    State(state): State<AppState>,
    Path((course_id, activity_id)): Path<(i64, i64)>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Response {
    let student_id = claims.sub;

    if let Err(e) =
        SubmissionService::check_can_submit(state.db(), student_id, course_id, activity_id).await
    {
        return service_error(e);
    }

    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return service_error(ServiceError::UploadFailed(format!(
                    "Malformed multipart body: {e}"
                )));
            }
        };

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if parts.len() == MAX_UPLOAD_FILES {
            return service_error(ServiceError::UploadFailed(format!(
                "At most {MAX_UPLOAD_FILES} files can be uploaded at once"
            )));
        }

        match field.bytes().await {
            Ok(bytes) => parts.push(UploadPart {
                file_name,
                bytes: bytes.to_vec(),
            }),
            Err(e) => {
                return service_error(ServiceError::UploadFailed(format!(
                    "Failed to read '{file_name}': {e}"
                )));
            }
        }
    }

    let key = upload_key(course_id, activity_id, student_id);
    match store_all(state.storage(), &key, parts, AppConfig::global().max_upload_bytes).await {
        Ok(files) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(files, "Files uploaded")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
