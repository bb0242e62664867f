use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait, QueryFilter};
use serde::Serialize;

/// A course in the catalog. Only the fields the grading engine reads are modelled;
/// `teacher_id` is the owning teacher and decides who may grade its activities.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,

    #[sea_orm(has_many = "super::activity::Entity")]
    Activities,

    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        code: &str,
        title: &str,
        description: Option<&str>,
        teacher_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            code: Set(code.to_owned()),
            title: Set(title.to_owned()),
            description: Set(description.map(str::to_owned)),
            teacher_id: Set(teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// True when `user_id` is the course's owning teacher.
    pub async fn is_taught_by<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
        user_id: i64,
    ) -> Result<bool, DbErr> {
        let count = Entity::find()
            .filter(Column::Id.eq(course_id))
            .filter(Column::TeacherId.eq(user_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_many<C: ConnectionTrait>(
        db: &C,
        course_ids: Vec<i64>,
    ) -> Result<Vec<Model>, DbErr> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::Id.is_in(course_ids))
            .all(db)
            .await
    }
}
