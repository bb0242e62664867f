use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::{
    Course,
    activity::{ActivityType, Model as ActivityModel, NewActivity},
};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use sea_orm::{DatabaseConnection, EntityTrait};
use services::ServiceError;

pub struct ActivitySeeder;

const KINDS: [(ActivityType, &str); 8] = [
    (ActivityType::Assignment, "Essay"),
    (ActivityType::Quiz, "Vocabulary quiz"),
    (ActivityType::Project, "Group project"),
    (ActivityType::Reading, "Reading response"),
    (ActivityType::Video, "Video summary"),
    (ActivityType::Practice, "Grammar drill"),
    (ActivityType::Discussion, "Discussion post"),
    (ActivityType::Exam, "Unit test"),
];

#[async_trait]
impl Seeder for ActivitySeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        let mut rng = StdRng::from_rng(OsRng)
            .map_err(|e| ServiceError::Validation(format!("Failed to seed RNG: {e}")))?;
        let points = [10, 20, 25, 50, 100];

        for course in Course::find().all(db).await? {
            for unit in 1..=5 {
                let (kind, label) = KINDS[rng.gen_range(0..KINDS.len())];
                let total_points = points.choose(&mut rng).copied().unwrap_or(100);

                let mut new = NewActivity::new(course.id, &format!("Unit {unit}: {label}"), total_points);
                new.activity_type = kind;
                new.description = Some(format!("{label} for {}", course.title));
                new.min_passing_score = rng.gen_bool(0.3).then(|| total_points * 7 / 10);
                new.max_attempts = rng.gen_bool(0.5).then(|| rng.gen_range(1..=3));
                new.due_date = Some(Utc::now() + Duration::days(rng.gen_range(-14..=21)));
                new.allow_late = rng.gen_bool(0.6);
                new.late_penalty = if new.allow_late { rng.gen_range(0..=30) } else { 0 };

                let activity = ActivityModel::create(db, new).await?;
                // the last unit of each course stays a draft
                if unit < 5 {
                    ActivityModel::set_published(db, activity.id, true).await?;
                }
            }
        }

        Ok(())
    }
}
