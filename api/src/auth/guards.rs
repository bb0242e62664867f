//! Role guards, applied as `route_layer`s so they run before any handler touches
//! the database. Course ownership is checked later by the engine itself.

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::UserRole;

#[derive(serde::Serialize, Default)]
pub struct Empty;

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Helper to extract, validate user from request extensions and insert the back into the request
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_roles(
    req: Request<Body>,
    next: Next,
    roles: &[UserRole],
    failure_msg: &str,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if roles.contains(&user.0.role) {
        Ok(next.run(req).await)
    } else {
        Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))))
    }
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Student-only guard. Submissions and enrollments are always made by the
/// student named in the token.
pub async fn allow_student(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_roles(req, next, &[UserRole::Student], "Student access required").await
}

/// Teacher (or admin) guard.
pub async fn allow_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_roles(
        req,
        next,
        &[UserRole::Teacher, UserRole::Admin],
        "Teacher access required",
    )
    .await
}
