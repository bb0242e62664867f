use api::{routes::routes, state::AppState};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use services::storage::LocalFileStorage;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use util::config::{AppConfig, GradingPolicy, LatePenaltyMode};

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub storage_dir: TempDir,
}

/// Fresh in-memory database, temp-dir storage and default grading configuration.
pub async fn make_test_app() -> TestApp {
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_late_penalty_mode(LatePenaltyMode::Advisory);
    AppConfig::set_grading_policy(GradingPolicy::Best);
    AppConfig::set_max_upload_bytes(1024 * 1024);
    AppConfig::set_storage_base_url("/files");

    let db = setup_test_db().await;
    let storage_dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalFileStorage::new(storage_dir.path(), "/files"));

    let router = Router::new().nest("/api", routes(AppState::new(db.clone(), storage)));

    TestApp {
        router,
        db,
        storage_dir,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
