use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A gradable unit of work within a course.
///
/// Grading parameters (`total_points`, `min_passing_score`, `max_attempts`,
/// `allow_late`, `late_penalty`, `due_date`) are read by the submission engine;
/// everything else is presentation data. Activities stay invisible to students
/// until `is_published` is explicitly set.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub total_points: i32,
    /// Points needed to pass. `None` means 60% of `total_points`.
    pub min_passing_score: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    /// `None` means unlimited attempts.
    pub max_attempts: Option<i32>,
    pub allow_late: bool,
    /// Percentage (0-100).
    pub late_penalty: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
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
pub enum ActivityType {
    #[sea_orm(string_value = "assignment")]
    Assignment,

    #[sea_orm(string_value = "quiz")]
    Quiz,

    #[sea_orm(string_value = "project")]
    Project,

    #[sea_orm(string_value = "reading")]
    Reading,

    #[sea_orm(string_value = "video")]
    Video,

    #[sea_orm(string_value = "practice")]
    Practice,

    #[sea_orm(string_value = "discussion")]
    Discussion,

    #[sea_orm(string_value = "exam")]
    Exam,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,

    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields a teacher supplies when defining an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: ActivityType,
    pub total_points: i32,
    pub min_passing_score: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_attempts: Option<i32>,
    pub allow_late: bool,
    pub late_penalty: i32,
}

impl NewActivity {
    /// An unlimited, undated assignment worth `total_points`.
    pub fn new(course_id: i64, title: &str, total_points: i32) -> Self {
        Self {
            course_id,
            title: title.to_owned(),
            description: None,
            activity_type: ActivityType::Assignment,
            total_points,
            min_passing_score: None,
            due_date: None,
            max_attempts: None,
            allow_late: false,
            late_penalty: 0,
        }
    }
}

impl Model {
    /// Inserts an unpublished activity. Publication is a separate, explicit step.
    pub async fn create<C: ConnectionTrait>(db: &C, new: NewActivity) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            course_id: Set(new.course_id),
            title: Set(new.title),
            description: Set(new.description),
            activity_type: Set(new.activity_type),
            total_points: Set(new.total_points),
            min_passing_score: Set(new.min_passing_score),
            due_date: Set(new.due_date),
            max_attempts: Set(new.max_attempts),
            allow_late: Set(new.allow_late),
            late_penalty: Set(new.late_penalty.clamp(0, 100)),
            is_published: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn set_published<C: ConnectionTrait>(
        db: &C,
        activity_id: i64,
        published: bool,
    ) -> Result<Model, DbErr> {
        let activity = Entity::find_by_id(activity_id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!(
                "Activity {activity_id} not found"
            )))?;

        let mut active: ActiveModel = activity.into();
        active.is_published = Set(published);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Looks up an activity only if it belongs to `course_id`.
    pub async fn find_in_course<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
        activity_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(activity_id)
            .filter(Column::CourseId.eq(course_id))
            .one(db)
            .await
    }

    pub async fn find_for_course<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn find_published_for_course<C: ConnectionTrait>(
        db: &C,
        course_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::IsPublished.eq(true))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// `min_passing_score` when set, otherwise `floor(total_points * 0.6)`.
    pub fn passing_threshold(&self) -> i32 {
        match self.min_passing_score {
            Some(score) => score,
            None => self.total_points * 3 / 5,
        }
    }
}
