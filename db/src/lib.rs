pub mod models;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config::AppConfig;

/// Opens the configured database.
///
/// `DATABASE_PATH` may be a `sqlite:` URL or a plain SQLite file path; for the
/// latter the parent directory is created first since SQLite won't create
/// intermediate dirs.
pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = sqlite_url(&AppConfig::global().database_path)?;
    Database::connect(&url).await
}

fn sqlite_url(path_or_url: &str) -> Result<String, DbErr> {
    if path_or_url.starts_with("sqlite:") {
        return Ok(path_or_url.to_owned());
    }

    if let Some(parent) = Path::new(path_or_url).parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbErr::Custom(format!(
                "Cannot create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(format!("sqlite://{path_or_url}?mode=rwc"))
}
