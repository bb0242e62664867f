use crate::access::{find_course, is_course_teacher, Actor};
use crate::attempt_policy::AttemptLimit;
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use db::models::activity::{ActivityType, Model as ActivityModel};
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// An activity with its derived grading parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub total_points: i32,
    pub passing_threshold: i32,
    pub due_date: Option<DateTime<Utc>>,
    /// `None` for unlimited.
    pub max_attempts: Option<u32>,
    pub allow_late: bool,
    pub late_penalty: i32,
    pub is_published: bool,
}

impl From<ActivityModel> for ActivitySummary {
    fn from(a: ActivityModel) -> Self {
        let max_attempts = match AttemptLimit::from_column(a.max_attempts) {
            AttemptLimit::Unlimited => None,
            AttemptLimit::Limited(n) => Some(n),
        };
        Self {
            passing_threshold: a.passing_threshold(),
            id: a.id,
            course_id: a.course_id,
            title: a.title,
            description: a.description,
            activity_type: a.activity_type,
            total_points: a.total_points,
            due_date: a.due_date,
            max_attempts,
            allow_late: a.allow_late,
            late_penalty: a.late_penalty,
            is_published: a.is_published,
        }
    }
}

pub struct ActivityService;

impl ActivityService {
    /// Activities of a course. The course's teacher and admins see drafts too;
    /// everyone else only sees published ones.
    pub async fn list<C: ConnectionTrait>(
        db: &C,
        actor: &Actor,
        course_id: i64,
    ) -> Result<Vec<ActivitySummary>, ServiceError> {
        find_course(db, course_id).await?;
        let activities = if is_course_teacher(db, actor, course_id).await? {
            ActivityModel::find_for_course(db, course_id).await?
        } else {
            ActivityModel::find_published_for_course(db, course_id).await?
        };
        Ok(activities.into_iter().map(ActivitySummary::from).collect())
    }
}
