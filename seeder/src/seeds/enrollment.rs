use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::{
    Course,
    user::{self, UserRole},
};
use rand::rngs::{OsRng, StdRng};
use rand::{SeedableRng, seq::SliceRandom};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::{ServiceError, enrollment_service::EnrollmentService};

pub struct EnrollmentSeeder;

#[async_trait]
impl Seeder for EnrollmentSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        let mut rng = StdRng::from_rng(OsRng)
            .map_err(|e| ServiceError::Validation(format!("Failed to seed RNG: {e}")))?;

        let students = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Student))
            .all(db)
            .await?;
        let courses = Course::find().all(db).await?;

        for student in &students {
            for course in courses.choose_multiple(&mut rng, 3) {
                EnrollmentService::enroll(db, student.id, course.id).await?;
            }

            // one cancelled enrollment now and then, to exercise history
            if fastrand::u8(..10) == 0 {
                if let Some(course) = courses.choose(&mut rng) {
                    if EnrollmentService::is_enrolled(db, student.id, course.id).await? {
                        EnrollmentService::cancel(db, student.id, course.id).await?;
                    }
                }
            }
        }

        Ok(())
    }
}
