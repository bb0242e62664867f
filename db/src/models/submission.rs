use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One numbered attempt by a student at an activity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub activity_id: i64,
    pub student_id: i64,
    /// The ACTIVE enrollment the attempt was made under.
    pub enrollment_id: i64,
    /// 1-based and gap-free per (activity, student).
    pub attempt_number: i32,
    pub submission_text: Option<String>,
    pub status: SubmissionStatus,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub graded_at: Option<DateTime<Utc>>,
    pub graded_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SubmissionStatus {
    #[sea_orm(string_value = "draft")]
    Draft,

    #[sea_orm(string_value = "submitted")]
    Submitted,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "graded")]
    Graded,

    #[sea_orm(string_value = "returned")]
    Returned,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity::Entity",
        from = "Column::ActivityId",
        to = "super::activity::Column::Id"
    )]
    Activity,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollment::Column::Id"
    )]
    Enrollment,

    #[sea_orm(has_many = "super::submission_file::Entity")]
    Files,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activity.def()
    }
}

impl Related<super::submission_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Grading fields written together in a single update.
#[derive(Debug, Clone)]
pub struct GradeUpdate {
    pub status: SubmissionStatus,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub graded_at: Option<DateTime<Utc>>,
    pub graded_by: i64,
}

impl Model {
    /// Number of attempts (of any status) the student has made at the activity.
    pub async fn count_attempts<C: ConnectionTrait>(
        db: &C,
        activity_id: i64,
        student_id: i64,
    ) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::StudentId.eq(student_id))
            .count(db)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_attempt<C: ConnectionTrait>(
        db: &C,
        activity_id: i64,
        student_id: i64,
        enrollment_id: i64,
        attempt_number: i32,
        submission_text: Option<String>,
        status: SubmissionStatus,
        submitted_at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            activity_id: Set(activity_id),
            student_id: Set(student_id),
            enrollment_id: Set(enrollment_id),
            attempt_number: Set(attempt_number),
            submission_text: Set(submission_text),
            status: Set(status),
            score: Set(None),
            feedback: Set(None),
            submitted_at: Set(submitted_at),
            graded_at: Set(None),
            graded_by: Set(None),
            updated_at: Set(submitted_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Overwrites status, score, feedback and grading timestamps in one statement.
    pub async fn apply_grade<C: ConnectionTrait>(
        db: &C,
        submission: Model,
        grade: GradeUpdate,
    ) -> Result<Model, DbErr> {
        let mut active: ActiveModel = submission.into();
        active.status = Set(grade.status);
        active.score = Set(grade.score);
        active.feedback = Set(grade.feedback);
        active.graded_at = Set(grade.graded_at);
        active.graded_by = Set(Some(grade.graded_by));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// A student's attempts at one activity, attempt ascending.
    pub async fn find_for_student_activity<C: ConnectionTrait>(
        db: &C,
        activity_id: i64,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::AttemptNumber)
            .all(db)
            .await
    }

    /// Every submission for an activity, grouped by student then attempt.
    pub async fn find_for_activity<C: ConnectionTrait>(
        db: &C,
        activity_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ActivityId.eq(activity_id))
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::AttemptNumber)
            .all(db)
            .await
    }

    /// Graded submissions of one student across a set of activities.
    pub async fn find_graded_for_student<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        activity_ids: Vec<i64>,
    ) -> Result<Vec<Model>, DbErr> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ActivityId.is_in(activity_ids))
            .filter(Column::Status.eq(SubmissionStatus::Graded))
            .order_by_asc(Column::ActivityId)
            .order_by_asc(Column::AttemptNumber)
            .all(db)
            .await
    }

    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }
}
