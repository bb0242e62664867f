use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder};
use serde::Serialize;

/// Metadata for one uploaded artifact of a submission. Written once with its
/// submission and never updated.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "submission_files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    /// Upload order within the submission, starting at 0.
    pub position: i32,
    pub file_name: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission::Entity",
        from = "Column::SubmissionId",
        to = "super::submission::Column::Id"
    )]
    Submission,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        submission_id: i64,
        position: i32,
        file_name: &str,
        url: &str,
        mime_type: &str,
        size_bytes: i64,
        uploaded_at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            submission_id: Set(submission_id),
            position: Set(position),
            file_name: Set(file_name.to_owned()),
            url: Set(url.to_owned()),
            mime_type: Set(mime_type.to_owned()),
            size_bytes: Set(size_bytes),
            uploaded_at: Set(uploaded_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_for_submission<C: ConnectionTrait>(
        db: &C,
        submission_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::Position)
            .all(db)
            .await
    }

    /// Files of several submissions, ordered by submission then position.
    pub async fn find_for_submissions<C: ConnectionTrait>(
        db: &C,
        submission_ids: Vec<i64>,
    ) -> Result<Vec<Model>, DbErr> {
        if submission_ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::SubmissionId.is_in(submission_ids))
            .order_by_asc(Column::SubmissionId)
            .order_by_asc(Column::Position)
            .all(db)
            .await
    }
}
