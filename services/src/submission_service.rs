use crate::access::{ensure_course_teacher, find_course, Actor};
use crate::attempt_policy::{evaluate, AttemptRules};
use crate::enrollment_service::EnrollmentService;
use crate::error::{is_unique_violation, ServiceError};
use crate::storage::{is_issued_under, StoredFile};
use crate::submission_state::{plan_grade, GradeRequest, PenaltyInfo};
use chrono::{DateTime, Utc};
use db::models::{
    activity::Model as ActivityModel,
    submission::Model as SubmissionModel,
    submission_file::Model as SubmissionFileModel,
    user::UserRole,
    Submission,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};
use util::{config::AppConfig, paths::upload_key};

/// Concurrent submits may race for the same attempt number; the loser retries
/// this many times before giving up.
const MAX_ATTEMPT_RETRIES: usize = 3;

/// A student's submit request. Files have already been stored.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub course_id: i64,
    pub activity_id: i64,
    pub submission_text: Option<String>,
    pub files: Vec<StoredFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionWithFiles {
    #[serde(flatten)]
    pub submission: SubmissionModel,
    pub files: Vec<SubmissionFileModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeOutcome {
    pub submission: SubmissionModel,
    #[serde(flatten)]
    pub penalty: PenaltyInfo,
}

pub struct SubmissionService;

impl SubmissionService {
    pub async fn submit(
        db: &DatabaseConnection,
        student_id: i64,
        request: NewSubmission,
    ) -> Result<SubmissionWithFiles, ServiceError> {
        Self::submit_at(db, student_id, request, Utc::now()).await
    }

    /// Creates the next attempt as of `now`.
    ///
    /// The submission row and its file rows are written in one transaction, so a
    /// failure leaves nothing behind.
    pub async fn submit_at(
        db: &DatabaseConnection,
        student_id: i64,
        request: NewSubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmissionWithFiles, ServiceError> {
        let text = request
            .submission_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);
        if text.is_none() && request.files.is_empty() {
            return Err(ServiceError::EmptySubmission);
        }

        let activity = Self::visible_activity(db, request.course_id, request.activity_id).await?;
        ensure_own_uploads(student_id, &activity, &request.files)?;
        let rules = AttemptRules::from(&activity);

        for retry in 0..MAX_ATTEMPT_RETRIES {
            match Self::try_insert_attempt(db, student_id, &activity, &rules, text.as_deref(), &request.files, now).await {
                Err(ServiceError::Database(err)) if is_unique_violation(&err) => {
                    warn!(student_id, activity_id = activity.id, retry, "Attempt number taken concurrently, retrying");
                }
                Ok(created) => {
                    info!(
                        student_id,
                        activity_id = activity.id,
                        submission_id = created.submission.id,
                        attempt = created.submission.attempt_number,
                        status = %created.submission.status,
                        "Submission created"
                    );
                    return Ok(created);
                }
                Err(other) => return Err(other),
            }
        }

        Err(ServiceError::PersistenceConflict)
    }

    /// Runs the submit-time checks without writing anything, so uploads can be
    /// refused before bytes hit storage. `submit` checks again.
    pub async fn check_can_submit(
        db: &DatabaseConnection,
        student_id: i64,
        course_id: i64,
        activity_id: i64,
    ) -> Result<(), ServiceError> {
        let activity = Self::visible_activity(db, course_id, activity_id).await?;
        EnrollmentService::require_active(db, student_id, course_id).await?;
        let prior = SubmissionModel::count_attempts(db, activity.id, student_id).await?;
        evaluate(&AttemptRules::from(&activity), prior, Utc::now())?;
        Ok(())
    }

    async fn try_insert_attempt(
        db: &DatabaseConnection,
        student_id: i64,
        activity: &ActivityModel,
        rules: &AttemptRules,
        text: Option<&str>,
        files: &[StoredFile],
        now: DateTime<Utc>,
    ) -> Result<SubmissionWithFiles, ServiceError> {
        let txn = db.begin().await?;

        let enrollment =
            EnrollmentService::require_active(&txn, student_id, activity.course_id).await?;
        let prior = SubmissionModel::count_attempts(&txn, activity.id, student_id).await?;
        let decision = evaluate(rules, prior, now)?;

        let submission = SubmissionModel::insert_attempt(
            &txn,
            activity.id,
            student_id,
            enrollment.id,
            decision.attempt_number,
            text.map(str::to_owned),
            decision.status,
            now,
        )
        .await?;

        let mut stored = Vec::with_capacity(files.len());
        for (position, file) in files.iter().enumerate() {
            stored.push(
                SubmissionFileModel::create(
                    &txn,
                    submission.id,
                    position as i32,
                    &file.name,
                    &file.url,
                    &file.mime_type,
                    file.size_bytes,
                    now,
                )
                .await?,
            );
        }

        txn.commit().await?;
        Ok(SubmissionWithFiles {
            submission,
            files: stored,
        })
    }

    /// Applies a teacher's grading decision.
    ///
    /// Only the course's teacher (or an admin) may grade. Score, feedback,
    /// status and grading timestamp are written by a single update.
    pub async fn grade(
        db: &DatabaseConnection,
        actor: &Actor,
        course_id: i64,
        submission_id: i64,
        request: GradeRequest,
    ) -> Result<GradeOutcome, ServiceError> {
        find_course(db, course_id).await?;
        ensure_course_teacher(db, actor, course_id).await?;

        let not_found = || ServiceError::NotFound(format!("Submission {submission_id} not found"));
        let submission = Submission::find_by_id(submission_id)
            .one(db)
            .await?
            .ok_or_else(not_found)?;
        let activity = ActivityModel::find_in_course(db, course_id, submission.activity_id)
            .await?
            .ok_or_else(not_found)?;

        let mode = AppConfig::global().late_penalty_mode;
        let (update, penalty) = plan_grade(&submission, &activity, request, mode, actor.user_id, Utc::now())?;
        let previous = submission.status;
        let graded = SubmissionModel::apply_grade(db, submission, update).await?;

        info!(
            submission_id,
            grader = actor.user_id,
            from = %previous,
            to = %graded.status,
            score = ?graded.score,
            "Submission graded"
        );
        Ok(GradeOutcome {
            submission: graded,
            penalty,
        })
    }

    /// Attempts for one activity, files in upload order.
    ///
    /// Students get their own attempts (and need an ACTIVE enrollment); the
    /// course's teacher and admins get every student's.
    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        course_id: i64,
        activity_id: i64,
    ) -> Result<Vec<SubmissionWithFiles>, ServiceError> {
        let submissions = match actor.role {
            UserRole::Student => {
                Self::visible_activity(db, course_id, activity_id).await?;
                EnrollmentService::require_active(db, actor.user_id, course_id).await?;
                SubmissionModel::find_for_student_activity(db, activity_id, actor.user_id).await?
            }
            UserRole::Teacher | UserRole::Admin => {
                find_course(db, course_id).await?;
                ensure_course_teacher(db, actor, course_id).await?;
                ActivityModel::find_in_course(db, course_id, activity_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound(format!("Activity {activity_id} not found")))?;
                SubmissionModel::find_for_activity(db, activity_id).await?
            }
        };

        attach_files(db, submissions).await
    }

    /// Published activity of the course, as seen by students.
    async fn visible_activity<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
        activity_id: i64,
    ) -> Result<ActivityModel, ServiceError> {
        ActivityModel::find_in_course(db, course_id, activity_id)
            .await?
            .filter(|a| a.is_published)
            .ok_or_else(|| ServiceError::NotFound(format!("Activity {activity_id} not found")))
    }
}

/// Every attached file must have been stored for this student and activity.
fn ensure_own_uploads(
    student_id: i64,
    activity: &ActivityModel,
    files: &[StoredFile],
) -> Result<(), ServiceError> {
    let base_url = AppConfig::global().storage_base_url;
    let key = upload_key(activity.course_id, activity.id, student_id);
    match files.iter().find(|f| !is_issued_under(&base_url, &key, &f.url)) {
        Some(file) => Err(ServiceError::Validation(format!(
            "File '{}' was not uploaded for this activity",
            file.name
        ))),
        None => Ok(()),
    }
}

async fn attach_files<C: ConnectionTrait>(
    db: &C,
    submissions: Vec<SubmissionModel>,
) -> Result<Vec<SubmissionWithFiles>, ServiceError> {
    let ids = submissions.iter().map(|s| s.id).collect();
    let mut by_submission: HashMap<i64, Vec<SubmissionFileModel>> = HashMap::new();
    for file in SubmissionFileModel::find_for_submissions(db, ids).await? {
        by_submission.entry(file.submission_id).or_default().push(file);
    }

    Ok(submissions
        .into_iter()
        .map(|submission| SubmissionWithFiles {
            files: by_submission.remove(&submission.id).unwrap_or_default(),
            submission,
        })
        .collect())
}
