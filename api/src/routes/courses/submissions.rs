//! Submission endpoints: submit an attempt, list attempts, grade.

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{json_rejection, service_error, validation_error};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::submission::SubmissionStatus;
use serde::Deserialize;
use services::{
    ServiceError,
    storage::StoredFile,
    submission_service::{NewSubmission, SubmissionService},
    submission_state::GradeRequest,
};
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    #[validate(length(max = 50000, message = "Submission text is limited to 50000 characters"))]
    pub submission_text: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10, message = "At most 10 files can be attached"), nested)]
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmissionRequest {
    pub score: Option<i32>,

    #[validate(length(max = 10000, message = "Feedback is limited to 10000 characters"))]
    pub feedback: Option<String>,

    /// `graded` (default) or `returned`, case-insensitive.
    pub status: Option<String>,
}

/// POST /api/courses/{course_id}/activities/{activity_id}/submissions
///
/// Submits the caller's next attempt. Files must have been uploaded first.
///
/// ### Request Body
/// ```json
/// {
///   "submissionText": "My essay ...",
///   "files": [{ "name": "essay.pdf", "url": "/files/...", "mimeType": "application/pdf", "sizeBytes": 20480 }]
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the submission and its files; `status` is `late` for an accepted late attempt
/// - `400 Bad Request` if an attached file is not in storage, or the body is not valid JSON
/// - `403 Forbidden` if the caller has no ACTIVE enrollment
/// - `404 Not Found` if the activity is unknown or unpublished
/// - `409 Conflict` if attempts are exhausted, the window has closed, or a concurrent submit won repeatedly
/// - `422 Unprocessable Entity` if neither text nor files were given, or a file was
///   uploaded for another student or activity
pub async fn submit(
    State(state): State<AppState>,
    Path((course_id, activity_id)): Path<(i64, i64)>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(rejection),
    };
    if let Err(errors) = req.validate() {
        return validation_error(&errors);
    }

    for file in &req.files {
        if !state.storage().exists(&file.url).await {
            return service_error(ServiceError::UploadFailed(format!(
                "File '{}' is not in storage",
                file.name
            )));
        }
    }

    let request = NewSubmission {
        course_id,
        activity_id,
        submission_text: req.submission_text,
        files: req.files,
    };

    match SubmissionService::submit(state.db(), claims.sub, request).await {
        Ok(created) => {
            let message = if created.submission.status == SubmissionStatus::Late {
                "Submission received after the due date"
            } else {
                "Submission received"
            };
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(created, message)),
            )
                .into_response()
        }
        Err(e) => service_error(e),
    }
}

/// GET /api/courses/{course_id}/activities/{activity_id}/submissions
///
/// - **Student**: their own attempts, attempt ascending.
/// - **Teacher/Admin**: every submission of the activity.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path((course_id, activity_id)): Path<(i64, i64)>,
    user: AuthUser,
) -> Response {
    match SubmissionService::list(state.db(), &user.actor(), course_id, activity_id).await {
        Ok(submissions) => {
            Json(ApiResponse::success(submissions, "Submissions retrieved")).into_response()
        }
        Err(e) => service_error(e),
    }
}

/// PUT /api/courses/{course_id}/submissions/{submission_id}/grade
///
/// Grades (or returns) a submission. Re-grading overwrites the previous grade.
///
/// ### Request Body
/// ```json
/// { "score": 85, "feedback": "Clear argument", "status": "graded" }
/// ```
///
/// ### Responses
/// - `200 OK` with the updated submission plus `rawScore`, `latePenalty` and `penaltyApplied`
/// - `403 Forbidden` if the caller does not teach the course
/// - `404 Not Found` if the submission is not in this course
/// - `409 Conflict` for a transition the lifecycle does not allow
/// - `422 Unprocessable Entity` for a missing or out-of-range score or an unknown status
pub async fn grade_submission(
    State(state): State<AppState>,
    Path((course_id, submission_id)): Path<(i64, i64)>,
    user: AuthUser,
    payload: Result<Json<GradeSubmissionRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(rejection),
    };
    if let Err(errors) = req.validate() {
        return validation_error(&errors);
    }

    let status = match req.status.as_deref().map(SubmissionStatus::from_str) {
        None => SubmissionStatus::Graded,
        Some(Ok(status)) => status,
        Some(Err(_)) => {
            return service_error(ServiceError::Validation(format!(
                "Unknown submission status '{}'",
                req.status.unwrap_or_default()
            )));
        }
    };

    let request = GradeRequest {
        status,
        score: req.score,
        feedback: req.feedback,
    };

    match SubmissionService::grade(state.db(), &user.actor(), course_id, submission_id, request)
        .await
    {
        Ok(outcome) => Json(ApiResponse::success(outcome, "Submission graded")).into_response(),
        Err(e) => service_error(e),
    }
}
