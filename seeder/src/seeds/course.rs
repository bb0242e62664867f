use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::{
    course::Model as CourseModel,
    user::{self, UserRole},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use services::ServiceError;

pub struct CourseSeeder;

const COURSES: [(&str, &str, &str); 6] = [
    ("ENG101", "Academic Writing", "Essays, paragraphs and citation practice."),
    ("ENG110", "Reading Skills", "Skimming, scanning and close reading."),
    ("ENG120", "Grammar in Use", "Tenses, conditionals and reported speech."),
    ("ENG201", "Public Speaking", "Presentations and structured argument."),
    ("ENG210", "Business English", "Emails, meetings and negotiation."),
    ("ENG305", "Literature Seminar", "Short stories and poetry discussion."),
];

#[async_trait]
impl Seeder for CourseSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), ServiceError> {
        let teachers = user::Entity::find()
            .filter(user::Column::Role.eq(UserRole::Teacher))
            .all(db)
            .await?;
        if teachers.is_empty() {
            return Ok(());
        }

        for (i, (code, title, description)) in COURSES.iter().enumerate() {
            let teacher = &teachers[i % teachers.len()];
            CourseModel::create(db, code, title, Some(description), teacher.id).await?;
        }

        Ok(())
    }
}
