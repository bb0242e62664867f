use api::auth::generate_jwt;
use db::models::{
    activity::{Model as ActivityModel, NewActivity},
    course::Model as CourseModel,
    user::{Model as UserModel, RoleDetails, UserRole},
};
use sea_orm::DatabaseConnection;
use services::enrollment_service::EnrollmentService;

pub struct TestData {
    pub teacher: UserModel,
    pub teacher_token: String,
    pub student: UserModel,
    pub student_token: String,
    pub course: CourseModel,
}

pub async fn user(db: &DatabaseConnection, name: &str, role: UserRole) -> (UserModel, String) {
    let user = UserModel::create(db, name, &format!("{name}@test.com"), RoleDetails::empty_for(role))
        .await
        .unwrap();
    let (token, _) = generate_jwt(user.id, user.role).unwrap();
    (user, token)
}

/// A teacher, their course and one student who is not yet enrolled.
pub async fn setup(db: &DatabaseConnection) -> TestData {
    let (teacher, teacher_token) = user(db, "teacher", UserRole::Teacher).await;
    let (student, student_token) = user(db, "student", UserRole::Student).await;
    let course = CourseModel::create(db, "ENG101", "Academic Writing", None, teacher.id)
        .await
        .unwrap();
    TestData {
        teacher,
        teacher_token,
        student,
        student_token,
        course,
    }
}

pub async fn enroll(db: &DatabaseConnection, student_id: i64, course_id: i64) {
    EnrollmentService::enroll(db, student_id, course_id).await.unwrap();
}

pub async fn published(db: &DatabaseConnection, new: NewActivity) -> ActivityModel {
    let activity = ActivityModel::create(db, new).await.unwrap();
    ActivityModel::set_published(db, activity.id, true).await.unwrap()
}
