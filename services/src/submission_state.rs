//! Submission lifecycle: which grading transitions exist and what a grading
//! request writes.
//!
//! ```text
//! (new) ──► SUBMITTED ──┬──► GRADED ◄──┐
//! (new) ──► LATE ───────┤      │  └────┘ re-grade
//!                       └──► RETURNED ──► GRADED
//! ```
//!
//! `DRAFT` is tolerated in reads but can never be graded. Nothing moves back to
//! `SUBMITTED`/`LATE`; a retry is a new attempt.

use crate::attempt_policy::{apply_late_penalty, is_late};
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use db::models::{
    activity::Model as ActivityModel,
    submission::{GradeUpdate, Model as SubmissionModel, SubmissionStatus},
};
use serde::Serialize;
use util::config::LatePenaltyMode;

/// Checks that a grading action may move a submission from `from` to `to`.
pub fn check_transition(
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> Result<(), ServiceError> {
    use SubmissionStatus::*;

    let allowed = matches!(
        (from, to),
        (Submitted | Late, Graded) | (Submitted | Late, Returned) | (Graded, Graded) | (Returned, Graded)
    );
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::InvalidTransition { from, to })
    }
}

/// What the teacher asked for.
#[derive(Debug, Clone)]
pub struct GradeRequest {
    pub status: SubmissionStatus,
    pub score: Option<i32>,
    pub feedback: Option<String>,
}

/// How the stored score relates to what the teacher entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyInfo {
    pub raw_score: Option<i32>,
    /// Late penalty percentage of the activity when the submission was late.
    pub late_penalty: Option<i32>,
    pub penalty_applied: bool,
}

/// Validates a grading request against the current submission and builds the
/// single update that realises it.
pub fn plan_grade(
    submission: &SubmissionModel,
    activity: &ActivityModel,
    request: GradeRequest,
    penalty_mode: LatePenaltyMode,
    grader_id: i64,
    now: DateTime<Utc>,
) -> Result<(GradeUpdate, PenaltyInfo), ServiceError> {
    check_transition(submission.status, request.status)?;

    let raw_score = match (request.status, request.score) {
        (SubmissionStatus::Graded, None) => {
            return Err(ServiceError::Validation(
                "A score is required to grade a submission".into(),
            ));
        }
        (_, score) => score,
    };

    if let Some(score) = raw_score {
        if score < 0 || score > activity.total_points {
            return Err(ServiceError::ScoreOutOfRange {
                total: activity.total_points,
            });
        }
    }

    let late = submission.status == SubmissionStatus::Late
        || is_late(activity.due_date, submission.submitted_at);
    let penalty = activity.late_penalty.clamp(0, 100);
    let auto = late && penalty > 0 && penalty_mode == LatePenaltyMode::Automatic;

    let stored_score = match raw_score {
        Some(score) if auto => Some(apply_late_penalty(score, penalty)),
        other => other,
    };

    let graded_at = match request.status {
        SubmissionStatus::Graded => Some(now),
        _ => None,
    };

    let feedback = request
        .feedback
        .map(|f| f.trim().to_owned())
        .filter(|f| !f.is_empty());

    Ok((
        GradeUpdate {
            status: request.status,
            score: stored_score,
            feedback,
            graded_at,
            graded_by: grader_id,
        },
        PenaltyInfo {
            raw_score,
            late_penalty: late.then_some(penalty),
            penalty_applied: auto && raw_score.is_some(),
        },
    ))
}
