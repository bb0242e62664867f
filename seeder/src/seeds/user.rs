use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::user::{Model, RoleDetails, UserRole};
use fake::{Fake, faker::internet::en::SafeEmail};
use sea_orm::DatabaseConnection;
use services::ServiceError;

pub struct UserSeeder;

const LEVELS: [&str; 5] = ["A2", "B1", "B2", "C1", "C2"];

#[async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        // Fixed accounts
        Model::create(db, "admin", "admin@example.com", RoleDetails::empty_for(UserRole::Admin)).await?;
        Model::create(
            db,
            "t.smith",
            "teacher@example.com",
            RoleDetails::Teacher {
                department: Some("English Language".into()),
                bio: None,
            },
        )
        .await?;
        Model::create(db, "t.jones", "teacher2@example.com", RoleDetails::empty_for(UserRole::Teacher)).await?;
        Model::create(
            db,
            "student",
            "student@example.com",
            RoleDetails::Student {
                student_number: Some("s00000001".into()),
                level: Some("B1".into()),
            },
        )
        .await?;

        // Random students
        for _ in 0..12 {
            let number = format!("s{:08}", fastrand::u32(..100_000_000));
            let email: String = SafeEmail().fake();
            Model::create(
                db,
                &number,
                &email,
                RoleDetails::Student {
                    student_number: Some(number.clone()),
                    level: Some(LEVELS[fastrand::usize(..LEVELS.len())].into()),
                },
            )
            .await?;
        }

        Ok(())
    }
}
