use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    activity::ActivitySeeder, course::CourseSeeder, enrollment::EnrollmentSeeder,
    submission::SubmissionSeeder, user::UserSeeder,
};
use colored::*;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {e}", "Failed to connect to the database:".red());
            std::process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {e}", "Failed to apply migrations:".red());
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(CourseSeeder), "Course"),
        (Box::new(ActivitySeeder), "Activity"),
        (Box::new(EnrollmentSeeder), "Enrollment"),
        (Box::new(SubmissionSeeder), "Submission"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
