use crate::error::ServiceError;
use db::models::{course::Model as CourseModel, user::UserRole};
use sea_orm::{ConnectionTrait, EntityTrait};

/// The authenticated caller, as resolved from the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Loads a course or fails with `NotFound`.
pub async fn find_course<C: ConnectionTrait>(
    db: &C,
    course_id: i64,
) -> Result<CourseModel, ServiceError> {
    db::models::Course::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Course {course_id} not found")))
}

/// Passes when the actor teaches the course. Admins always pass.
pub async fn ensure_course_teacher<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    course_id: i64,
) -> Result<(), ServiceError> {
    if actor.is_admin() {
        return Ok(());
    }
    if actor.role == UserRole::Teacher
        && CourseModel::is_taught_by(db, course_id, actor.user_id).await?
    {
        return Ok(());
    }
    Err(ServiceError::Unauthorized(
        "Only the course's teacher may perform this action".into(),
    ))
}

/// Like [`ensure_course_teacher`] but answers instead of failing.
pub async fn is_course_teacher<C: ConnectionTrait>(
    db: &C,
    actor: &Actor,
    course_id: i64,
) -> Result<bool, ServiceError> {
    match ensure_course_teacher(db, actor, course_id).await {
        Ok(()) => Ok(true),
        Err(ServiceError::Unauthorized(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
