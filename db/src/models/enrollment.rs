use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A student's registration in a course. Rows are never deleted; cancelling an
/// enrollment moves it to `Cancelled` and keeps it as history.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
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
pub enum EnrollmentStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The single active enrollment for the pair, if any.
    pub async fn find_active<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active))
            .one(db)
            .await
    }

    /// Every enrollment row for the pair, oldest first.
    pub async fn history<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn active_for_student<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active))
            .order_by_asc(Column::CourseId)
            .all(db)
            .await
    }

    pub async fn insert_active<C: ConnectionTrait>(
        db: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            status: Set(EnrollmentStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn set_status<C: ConnectionTrait>(
        db: &C,
        enrollment: Model,
        status: EnrollmentStatus,
    ) -> Result<Model, DbErr> {
        let mut active: ActiveModel = enrollment.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }
}
