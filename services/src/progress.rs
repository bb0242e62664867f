//! Per-course progress from graded work.
//!
//! Only published activities with at least one graded submission count; an
//! activity nobody graded yet is left out of both sides of the ratio.

use db::models::{
    activity::Model as ActivityModel,
    submission::{Model as SubmissionModel, SubmissionStatus},
};
use serde::Serialize;
use std::collections::HashMap;
use util::config::GradingPolicy;

/// `{ total, passed, percentage }` as consumed by course and dashboard views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: u32,
    pub passed: u32,
    pub percentage: u32,
}

impl Progress {
    fn from_counts(total: u32, passed: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(passed) / f64::from(total) * 100.0).round() as u32
        };
        Self {
            total,
            passed,
            percentage,
        }
    }
}

/// Picks the graded submission that represents the student's result.
///
/// `Best` takes the highest score, `Last` the highest attempt number.
pub fn representative<'a, I>(graded: I, policy: GradingPolicy) -> Option<&'a SubmissionModel>
where
    I: IntoIterator<Item = &'a SubmissionModel>,
{
    let graded = graded
        .into_iter()
        .filter(|s| s.status == SubmissionStatus::Graded && s.score.is_some());
    match policy {
        GradingPolicy::Best => graded.max_by_key(|s| (s.score, s.attempt_number)),
        GradingPolicy::Last => graded.max_by_key(|s| s.attempt_number),
    }
}

/// Computes progress for one student in one course.
///
/// `submissions` may contain any of the student's submissions; non-graded ones
/// and ones for activities not in `activities` are ignored.
pub fn compute(
    activities: &[ActivityModel],
    submissions: &[SubmissionModel],
    policy: GradingPolicy,
) -> Progress {
    let mut by_activity: HashMap<i64, Vec<&SubmissionModel>> = HashMap::new();
    for submission in submissions {
        by_activity
            .entry(submission.activity_id)
            .or_default()
            .push(submission);
    }

    let mut total = 0;
    let mut passed = 0;
    for activity in activities.iter().filter(|a| a.is_published) {
        let Some(attempts) = by_activity.get(&activity.id) else {
            continue;
        };
        let Some(chosen) = representative(attempts.iter().copied(), policy) else {
            continue;
        };
        total += 1;
        if chosen.score.unwrap_or(0) >= activity.passing_threshold() {
            passed += 1;
        }
    }

    Progress::from_counts(total, passed)
}
