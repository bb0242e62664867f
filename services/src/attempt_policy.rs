//! Whether a student may submit another attempt, and in which state it starts.

use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use db::models::{activity::Model as ActivityModel, submission::SubmissionStatus};

/// How many attempts an activity allows. Unlimited is its own variant so it is
/// never compared against a numeric ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptLimit {
    Unlimited,
    Limited(u32),
}

impl AttemptLimit {
    /// Maps the nullable `max_attempts` column. Non-positive values are treated
    /// as unlimited since the column only ever stores positive limits.
    pub fn from_column(max_attempts: Option<i32>) -> Self {
        match max_attempts {
            Some(n) if n > 0 => AttemptLimit::Limited(n as u32),
            _ => AttemptLimit::Unlimited,
        }
    }

    pub fn is_exhausted(&self, prior_attempts: u64) -> bool {
        match self {
            AttemptLimit::Unlimited => false,
            AttemptLimit::Limited(max) => prior_attempts >= u64::from(*max),
        }
    }
}

/// The grading parameters of an activity that govern new attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRules {
    pub due_date: Option<DateTime<Utc>>,
    pub allow_late: bool,
    pub late_penalty: i32,
    pub limit: AttemptLimit,
}

impl From<&ActivityModel> for AttemptRules {
    fn from(activity: &ActivityModel) -> Self {
        Self {
            due_date: activity.due_date,
            allow_late: activity.allow_late,
            late_penalty: activity.late_penalty.clamp(0, 100),
            limit: AttemptLimit::from_column(activity.max_attempts),
        }
    }
}

/// Outcome of a successful [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptDecision {
    pub attempt_number: i32,
    pub status: SubmissionStatus,
    pub is_late: bool,
    /// Penalty percentage recorded for the grader; `0` for on-time attempts.
    pub late_penalty: i32,
}

/// `true` once `at` is strictly after the due date.
pub fn is_late(due_date: Option<DateTime<Utc>>, at: DateTime<Utc>) -> bool {
    due_date.is_some_and(|due| at > due)
}

/// Decides whether attempt `prior_attempts + 1` may be created at `now`.
pub fn evaluate(
    rules: &AttemptRules,
    prior_attempts: u64,
    now: DateTime<Utc>,
) -> Result<AttemptDecision, ServiceError> {
    if let AttemptLimit::Limited(max) = rules.limit {
        if rules.limit.is_exhausted(prior_attempts) {
            return Err(ServiceError::AttemptsExhausted { max });
        }
    }

    let late = is_late(rules.due_date, now);
    if late && !rules.allow_late {
        return Err(ServiceError::SubmissionWindowClosed);
    }

    let attempt_number = i32::try_from(prior_attempts + 1)
        .map_err(|_| ServiceError::Validation("Attempt number overflow".into()))?;

    Ok(AttemptDecision {
        attempt_number,
        status: if late {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        },
        is_late: late,
        late_penalty: if late { rules.late_penalty } else { 0 },
    })
}

/// `round(raw * (100 - penalty) / 100)`, never below zero.
pub fn apply_late_penalty(raw_score: i32, penalty_percent: i32) -> i32 {
    let penalty = penalty_percent.clamp(0, 100);
    let kept = f64::from(raw_score) * f64::from(100 - penalty) / 100.0;
    (kept.round() as i32).max(0)
}
