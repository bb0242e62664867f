use crate::access::{ensure_course_teacher, find_course, Actor};
use crate::enrollment_service::EnrollmentService;
use crate::error::ServiceError;
use crate::progress::{compute, Progress};
use db::models::{
    activity::Model as ActivityModel, course::Model as CourseModel,
    enrollment::Model as EnrollmentModel, submission::Model as SubmissionModel,
};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use util::config::{AppConfig, GradingPolicy};

/// Progress of one enrolled course, as listed on a student's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: i64,
    pub course_title: String,
    #[serde(flatten)]
    pub progress: Progress,
}

/// Read model over graded submissions. Nothing is cached; every call
/// recomputes from the store.
pub struct ProgressService;

impl ProgressService {
    /// Progress of a student in a course they are actively enrolled in.
    pub async fn for_course<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<Progress, ServiceError> {
        find_course(db, course_id).await?;
        EnrollmentService::require_active(db, student_id, course_id).await?;
        Self::compute_for(db, student_id, course_id, AppConfig::global().grading_policy).await
    }

    /// A teacher's view of one of their students.
    pub async fn for_student_as_teacher<C: ConnectionTrait>(
        db: &C,
        actor: &Actor,
        course_id: i64,
        student_id: i64,
    ) -> Result<Progress, ServiceError> {
        find_course(db, course_id).await?;
        ensure_course_teacher(db, actor, course_id).await?;
        if !EnrollmentService::is_enrolled(db, student_id, course_id).await? {
            return Err(ServiceError::NotFound(
                "Student is not enrolled in this course".into(),
            ));
        }
        Self::compute_for(db, student_id, course_id, AppConfig::global().grading_policy).await
    }

    /// Progress for every ACTIVE enrollment of the student, by course id.
    pub async fn for_student<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
    ) -> Result<Vec<CourseProgress>, ServiceError> {
        let policy = AppConfig::global().grading_policy;
        let enrollments = EnrollmentModel::active_for_student(db, student_id).await?;
        let courses =
            CourseModel::find_many(db, enrollments.iter().map(|e| e.course_id).collect()).await?;

        let mut out = Vec::with_capacity(courses.len());
        for course in courses {
            let progress = Self::compute_for(db, student_id, course.id, policy).await?;
            out.push(CourseProgress {
                course_id: course.id,
                course_title: course.title,
                progress,
            });
        }
        out.sort_by_key(|c| c.course_id);
        Ok(out)
    }

    async fn compute_for<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
        policy: GradingPolicy,
    ) -> Result<Progress, ServiceError> {
        let activities = ActivityModel::find_published_for_course(db, course_id).await?;
        let graded = SubmissionModel::find_graded_for_student(
            db,
            student_id,
            activities.iter().map(|a| a.id).collect(),
        )
        .await?;
        Ok(compute(&activities, &graded, policy))
    }
}
