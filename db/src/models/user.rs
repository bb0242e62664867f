use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, FromJsonQueryResult, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a user in the `users` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Platform-wide role.
    pub role: UserRole,
    /// Role-specific profile fields, stored as JSON.
    pub details: RoleDetails,
    /// Account lifecycle status (accounts are disabled, never deleted).
    pub status: UserStatus,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
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
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,

    #[sea_orm(string_value = "disabled")]
    Disabled,
}

/// Extra profile fields, one variant per role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleDetails {
    Student {
        student_number: Option<String>,
        /// CEFR level, e.g. "B1".
        level: Option<String>,
    },
    Teacher {
        department: Option<String>,
        bio: Option<String>,
    },
    Admin {
        #[serde(default)]
        permissions: Vec<String>,
    },
}

impl RoleDetails {
    pub fn role(&self) -> UserRole {
        match self {
            RoleDetails::Student { .. } => UserRole::Student,
            RoleDetails::Teacher { .. } => UserRole::Teacher,
            RoleDetails::Admin { .. } => UserRole::Admin,
        }
    }

    pub fn empty_for(role: UserRole) -> Self {
        match role {
            UserRole::Student => RoleDetails::Student {
                student_number: None,
                level: None,
            },
            UserRole::Teacher => RoleDetails::Teacher {
                department: None,
                bio: None,
            },
            UserRole::Admin => RoleDetails::Admin {
                permissions: Vec::new(),
            },
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new active user. The role column is derived from `details`, so the
    /// two can never disagree.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        username: &str,
        email: &str,
        details: RoleDetails,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            role: Set(details.role()),
            details: Set(details),
            status: Set(UserStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn find_active<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(user_id)
            .filter(Column::Status.eq(UserStatus::Active))
            .one(db)
            .await
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }
}
