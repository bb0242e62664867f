use crate::access::find_course;
use crate::error::{is_unique_violation, ServiceError};
use db::models::{
    enrollment::{EnrollmentStatus, Model as EnrollmentModel},
    user::Model as UserModel,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::info;

/// Guards the at-most-one-ACTIVE-enrollment rule per (student, course).
pub struct EnrollmentService;

impl EnrollmentService {
    /// Creates an ACTIVE enrollment.
    ///
    /// The lookup and the insert share a transaction, and the partial unique
    /// index on active rows rejects whichever concurrent insert commits second.
    pub async fn enroll(
        db: &DatabaseConnection,
        student_id: i64,
        course_id: i64,
    ) -> Result<EnrollmentModel, ServiceError> {
        let student = UserModel::find_active(db, student_id)
            .await?
            .filter(UserModel::is_student)
            .ok_or_else(|| ServiceError::NotFound("Student not found".into()))?;
        find_course(db, course_id).await?;

        let txn = db.begin().await?;
        if EnrollmentModel::find_active(&txn, student.id, course_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyEnrolled);
        }

        let enrollment = match EnrollmentModel::insert_active(&txn, student.id, course_id).await {
            Ok(enrollment) => enrollment,
            Err(err) if is_unique_violation(&err) => return Err(ServiceError::AlreadyEnrolled),
            Err(err) => return Err(err.into()),
        };
        txn.commit().await.map_err(|err| {
            if is_unique_violation(&err) {
                ServiceError::AlreadyEnrolled
            } else {
                ServiceError::Database(err)
            }
        })?;

        info!(student_id, course_id, enrollment_id = enrollment.id, "Student enrolled");
        Ok(enrollment)
    }

    pub async fn is_enrolled<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<bool, ServiceError> {
        Ok(EnrollmentModel::find_active(db, student_id, course_id)
            .await?
            .is_some())
    }

    /// ACTIVE → CANCELLED. The row is kept; a later `enroll` starts a new one.
    pub async fn cancel(
        db: &DatabaseConnection,
        student_id: i64,
        course_id: i64,
    ) -> Result<EnrollmentModel, ServiceError> {
        let active = EnrollmentModel::find_active(db, student_id, course_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No active enrollment for this course".into()))?;

        let cancelled =
            EnrollmentModel::set_status(db, active, EnrollmentStatus::Cancelled).await?;
        info!(student_id, course_id, enrollment_id = cancelled.id, "Enrollment cancelled");
        Ok(cancelled)
    }

    /// The student's ACTIVE enrollment, or `Unauthorized` when there is none.
    pub async fn require_active<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<EnrollmentModel, ServiceError> {
        EnrollmentModel::find_active(db, student_id, course_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Unauthorized("You are not enrolled in this course".into())
            })
    }
}
