//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → readiness check (public)
//! - `/courses` → enrollment, activities, uploads, submissions, grading and
//!   progress (authenticated, with per-route role guards)
//! - `/me` → the caller's own progress across courses (students)

use crate::auth::guards::{allow_authenticated, allow_student};
use crate::routes::{courses::course_routes, health::health_routes, me::me_routes};
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod common;
pub mod courses;
pub mod health;
pub mod me;

/// Builds the complete application router for all HTTP endpoints.
///
/// The state is applied here, so the returned router is ready to be nested
/// under `/api` by `main` or driven directly by tests.
pub fn routes(app_state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health_routes())
        .nest(
            "/courses",
            course_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/me", me_routes().route_layer(from_fn(allow_student)))
        .with_state(app_state)
}
