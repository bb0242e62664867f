//! Liveness and readiness of the grading engine's collaborators.

use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::error;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub database: bool,
    pub version: &'static str,
}

/// GET /api/health
///
/// Public. Pings the database so a load balancer stops routing submissions to an
/// instance that cannot persist them.
///
/// - `200 OK` with `{ "database": true, "version": "0.1.0" }`
/// - `503 Service Unavailable` with `database: false` when the ping fails
async fn health_check(State(state): State<AppState>) -> Response {
    let report = |database| HealthReport {
        database,
        version: env!("CARGO_PKG_VERSION"),
    };

    match state.db().ping().await {
        Ok(()) => Json(ApiResponse::success(report(true), "Health check passed")).into_response(),
        Err(e) => {
            error!(error = %e, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: report(false),
                    message: "Database unavailable".to_owned(),
                }),
            )
                .into_response()
        }
    }
}
