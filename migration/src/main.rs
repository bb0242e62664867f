use std::{fs, path::Path};
use util::config::AppConfig;

mod runner;

#[tokio::main]
async fn main() {
    let config = AppConfig::global();
    let db_path = config.database_path.clone();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
            remove_storage(&config.storage_root);
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            remove_storage(&config.storage_root);
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
        _ => {
            create_db_dir(&db_path);
            runner::run_all_migrations(&url).await;
        }
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn remove_storage(root: &str) {
    let storage_path = Path::new(root);
    if storage_path.exists() {
        fs::remove_dir_all(storage_path).expect("Failed to delete submission files");
        println!("Deleted submission files: {}", storage_path.display());
    } else {
        println!("Submission storage does not exist: {}", storage_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
