#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::empty_request,
        fixtures::{setup, user},
        make_test_app,
    };
    use axum::http::StatusCode;
    use db::models::{enrollment::Model as EnrollmentModel, user::UserRole};
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn enroll_twice_conflicts() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let uri = format!("/api/courses/{}/enrollment", data.course.id);

        let (status, json) = app.send(empty_request("POST", &uri, Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(json["data"]["studentId"], data.student.id);

        let (status, json) = app.send(empty_request("POST", &uri, Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Student is already enrolled in this course");
    }

    #[tokio::test]
    #[serial]
    async fn cancel_then_enroll_again_keeps_history() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let uri = format!("/api/courses/{}/enrollment", data.course.id);
        let token = Some(data.student_token.as_str());

        app.send(empty_request("POST", &uri, token)).await;
        let (_, json) = app.send(empty_request("GET", &uri, token)).await;
        assert_eq!(json["data"]["enrolled"], true);

        let (status, json) = app.send(empty_request("DELETE", &uri, token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "cancelled");

        let (_, json) = app.send(empty_request("GET", &uri, token)).await;
        assert_eq!(json["data"]["enrolled"], false);

        let (status, _) = app.send(empty_request("DELETE", &uri, token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(empty_request("POST", &uri, token)).await;
        assert_eq!(status, StatusCode::CREATED);

        let history = EnrollmentModel::history(&app.db, data.student.id, data.course.id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn enrollment_requires_a_student_token() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let uri = format!("/api/courses/{}/enrollment", data.course.id);

        let (status, json) = app.send(empty_request("POST", &uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);

        let (status, _) = app.send(empty_request("POST", &uri, Some("not-a-jwt"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app.send(empty_request("POST", &uri, Some(&data.teacher_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, admin_token) = user(&app.db, "admin", UserRole::Admin).await;
        let (status, _) = app.send(empty_request("POST", &uri, Some(&admin_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn unknown_course_is_not_found() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;

        let (status, json) = app
            .send(empty_request("POST", "/api/courses/9999/enrollment", Some(&data.student_token)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }
}
