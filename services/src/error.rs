use db::models::submission::SubmissionStatus;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Every way an engine operation can fail.
///
/// The `Display` text is what callers see; `Database` deliberately hides the
/// underlying cause, which is logged where the error is turned into a response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Student is already enrolled in this course")]
    AlreadyEnrolled,

    #[error("Maximum number of attempts ({max}) reached")]
    AttemptsExhausted { max: u32 },

    #[error("The submission window for this activity has closed")]
    SubmissionWindowClosed,

    #[error("A submission needs text or at least one file")]
    EmptySubmission,

    #[error("Score must be between 0 and {total}")]
    ScoreOutOfRange { total: i32 },

    #[error("File upload failed: {0}")]
    UploadFailed(String),

    #[error("The request conflicted with a concurrent change, please try again")]
    PersistenceConflict,

    #[error("Cannot change a {from} submission to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("{0}")]
    Validation(String),

    #[error("A database error occurred")]
    Database(#[from] DbErr),
}

impl ServiceError {
    /// HTTP status the API responds with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated => 401,
            ServiceError::Unauthorized(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::AlreadyEnrolled
            | ServiceError::PersistenceConflict
            | ServiceError::AttemptsExhausted { .. }
            | ServiceError::SubmissionWindowClosed
            | ServiceError::InvalidTransition { .. } => 409,
            ServiceError::EmptySubmission
            | ServiceError::ScoreOutOfRange { .. }
            | ServiceError::Validation(_) => 422,
            ServiceError::UploadFailed(_) => 400,
            ServiceError::Database(_) => 500,
        }
    }

    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Unauthenticated => "unauthenticated",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::AlreadyEnrolled => "already_enrolled",
            ServiceError::AttemptsExhausted { .. } => "attempts_exhausted",
            ServiceError::SubmissionWindowClosed => "submission_window_closed",
            ServiceError::EmptySubmission => "empty_submission",
            ServiceError::ScoreOutOfRange { .. } => "score_out_of_range",
            ServiceError::UploadFailed(_) => "upload_failed",
            ServiceError::PersistenceConflict => "persistence_conflict",
            ServiceError::InvalidTransition { .. } => "invalid_transition",
            ServiceError::Validation(_) => "validation",
            ServiceError::Database(_) => "database",
        }
    }
}

/// True when the store rejected a write because of a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
