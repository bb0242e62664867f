//! Application state shared by the route handlers through axum's `State<T>` extractor.

use sea_orm::DatabaseConnection;
use services::storage::FileStorage;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The file storage collaborator that receives uploaded submission files.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    storage: Arc<dyn FileStorage>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn FileStorage>) -> Self {
        Self { db, storage }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn storage(&self) -> &dyn FileStorage {
        self.storage.as_ref()
    }
}
