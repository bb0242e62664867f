//! # Course routes
//!
//! Everything a student or teacher does inside one course.
//!
//! - `enrollment.rs`: enroll, check and cancel (students)
//! - `activities.rs`: activity listing
//! - `uploads.rs`: multipart upload of submission files (students)
//! - `submissions.rs`: submit, list and grade
//! - `progress.rs`: course progress for students and teachers

use crate::auth::guards::{allow_student, allow_teacher};
use crate::state::AppState;
use activities::list_activities;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use enrollment::{cancel_enrollment, enroll, enrollment_status};
use progress::{my_course_progress, student_course_progress};
use submissions::{grade_submission, list_submissions, submit};
use uploads::{MAX_UPLOAD_FILES, upload_files};
use util::config::AppConfig;

pub mod activities;
pub mod enrollment;
pub mod progress;
pub mod submissions;
pub mod uploads;

/// Builds the `/courses` route group.
///
/// Routes:
/// - `POST   /{course_id}/enrollment` → enroll the calling student
/// - `GET    /{course_id}/enrollment` → whether the caller is actively enrolled
/// - `DELETE /{course_id}/enrollment` → cancel the caller's enrollment
/// - `GET    /{course_id}/activities` → activities visible to the caller
/// - `POST   /{course_id}/activities/{activity_id}/uploads` → store submission files
/// - `POST   /{course_id}/activities/{activity_id}/submissions` → submit an attempt
/// - `GET    /{course_id}/activities/{activity_id}/submissions` → own attempts, or all for the teacher
/// - `PUT    /{course_id}/submissions/{submission_id}/grade` → grade or return (teacher)
/// - `GET    /{course_id}/progress` → caller's progress (student)
/// - `GET    /{course_id}/students/{student_id}/progress` → a student's progress (teacher)
///
/// The whole group sits behind `allow_authenticated`; role guards below refine it.
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/{course_id}/enrollment", post(enroll).route_layer(from_fn(allow_student)))
        .route("/{course_id}/enrollment", get(enrollment_status).route_layer(from_fn(allow_student)))
        .route("/{course_id}/enrollment", delete(cancel_enrollment).route_layer(from_fn(allow_student)))
        .route("/{course_id}/activities", get(list_activities))
        .route(
            "/{course_id}/activities/{activity_id}/uploads",
            post(upload_files)
                .layer(DefaultBodyLimit::max(upload_body_limit()))
                .route_layer(from_fn(allow_student)),
        )
        .route(
            "/{course_id}/activities/{activity_id}/submissions",
            post(submit).route_layer(from_fn(allow_student)),
        )
        .route("/{course_id}/activities/{activity_id}/submissions", get(list_submissions))
        .route(
            "/{course_id}/submissions/{submission_id}/grade",
            put(grade_submission).route_layer(from_fn(allow_teacher)),
        )
        .route("/{course_id}/progress", get(my_course_progress).route_layer(from_fn(allow_student)))
        .route(
            "/{course_id}/students/{student_id}/progress",
            get(student_course_progress).route_layer(from_fn(allow_teacher)),
        )
}

/// Room for the maximum number of files plus multipart framing.
fn upload_body_limit() -> usize {
    let per_file = usize::try_from(AppConfig::global().max_upload_bytes).unwrap_or(usize::MAX);
    per_file.saturating_mul(MAX_UPLOAD_FILES).saturating_add(64 * 1024)
}
