use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::Path;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Migrated SQLite database in a file, for tests where several tasks share the
/// store through the pool.
pub async fn setup_file_test_db(path: &Path) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to file db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
