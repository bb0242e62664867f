use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::{
    Course, Enrollment,
    activity::Model as ActivityModel,
    enrollment::{self, EnrollmentStatus},
    submission::SubmissionStatus,
    user::UserRole,
};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::{
    ServiceError,
    access::Actor,
    submission_service::{NewSubmission, SubmissionService},
    submission_state::GradeRequest,
};

pub struct SubmissionSeeder;

const FEEDBACK: [&str; 4] = [
    "Clear structure, watch your articles.",
    "Good vocabulary range.",
    "Check subject-verb agreement.",
    "Well argued conclusion.",
];

#[async_trait]
impl Seeder for SubmissionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        let mut rng = StdRng::from_rng(OsRng)
            .map_err(|e| ServiceError::Validation(format!("Failed to seed RNG: {e}")))?;

        let enrollments = Enrollment::find()
            .filter(enrollment::Column::Status.eq(EnrollmentStatus::Active))
            .all(db)
            .await?;

        for enrollment in enrollments {
            let Some(course) = Course::find_by_id(enrollment.course_id).one(db).await? else {
                continue;
            };
            let teacher = Actor::new(course.teacher_id, UserRole::Teacher);

            for activity in ActivityModel::find_published_for_course(db, course.id).await? {
                if !rng.gen_bool(0.6) {
                    continue;
                }

                let attempts = rng.gen_range(1..=2);
                for attempt in 1..=attempts {
                    let created = match SubmissionService::submit(
                        db,
                        enrollment.student_id,
                        NewSubmission {
                            course_id: course.id,
                            activity_id: activity.id,
                            submission_text: Some(format!("Attempt {attempt} at {}", activity.title)),
                            files: Vec::new(),
                        },
                    )
                    .await
                    {
                        Ok(created) => created,
                        // closed windows and exhausted attempts are expected here
                        Err(ServiceError::SubmissionWindowClosed | ServiceError::AttemptsExhausted { .. }) => break,
                        Err(e) => return Err(e),
                    };

                    if rng.gen_bool(0.7) {
                        SubmissionService::grade(
                            db,
                            &teacher,
                            course.id,
                            created.submission.id,
                            GradeRequest {
                                status: SubmissionStatus::Graded,
                                score: Some(rng.gen_range(activity.total_points / 3..=activity.total_points)),
                                feedback: Some(FEEDBACK[rng.gen_range(0..FEEDBACK.len())].into()),
                            },
                        )
                        .await?;
                    }
                }
            }
        }

        Ok(())
    }
}
