use crate::state::AppState;
use axum::{Router, routing::get};

pub mod progress;

/// Builds the `/me` route group.
///
/// - `GET /progress` → progress for each course the caller is actively enrolled in
pub fn me_routes() -> Router<AppState> {
    Router::new().route("/progress", get(progress::get_my_progress))
}
