#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::json_request,
        fixtures::{TestData, enroll, published, setup, user},
        make_test_app,
    };
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::{activity::NewActivity, user::UserRole};
    use sea_orm::DatabaseConnection;
    use serde_json::json;
    use serial_test::serial;
    use services::submission_service::{NewSubmission, SubmissionService};
    use util::config::{AppConfig, LatePenaltyMode};

    async fn submitted(db: &DatabaseConnection, data: &TestData, new: NewActivity) -> i64 {
        let activity = published(db, new).await;
        SubmissionService::submit(
            db,
            data.student.id,
            NewSubmission {
                course_id: data.course.id,
                activity_id: activity.id,
                submission_text: Some("My essay".into()),
                files: Vec::new(),
            },
        )
        .await
        .unwrap()
        .submission
        .id
    }

    fn grade_uri(data: &TestData, submission_id: i64) -> String {
        format!("/api/courses/{}/submissions/{submission_id}/grade", data.course.id)
    }

    #[tokio::test]
    #[serial]
    async fn teacher_grades_and_regrades() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let id = submitted(&app.db, &data, NewActivity::new(data.course.id, "Essay", 100)).await;
        let uri = grade_uri(&data, id);
        let token = Some(data.teacher_token.as_str());

        let (status, json) = app
            .send(json_request("PUT", &uri, token, json!({ "score": 60, "feedback": "Good start" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["submission"]["status"], "graded");
        assert_eq!(json["data"]["submission"]["score"], 60);
        assert_eq!(json["data"]["submission"]["gradedBy"], data.teacher.id);
        assert_eq!(json["data"]["penaltyApplied"], false);

        let (status, json) = app
            .send(json_request("PUT", &uri, token, json!({ "score": 72, "status": "GRADED" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["submission"]["id"], id);
        assert_eq!(json["data"]["submission"]["score"], 72);
        assert_eq!(json["data"]["submission"]["attemptNumber"], 1);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_grades_are_rejected() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let id = submitted(&app.db, &data, NewActivity::new(data.course.id, "Essay", 100)).await;
        let uri = grade_uri(&data, id);
        let token = Some(data.teacher_token.as_str());

        let (status, json) = app.send(json_request("PUT", &uri, token, json!({ "score": 101 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["message"], "Score must be between 0 and 100");

        let (status, _) = app.send(json_request("PUT", &uri, token, json!({ "score": -1 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app.send(json_request("PUT", &uri, token, json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send(json_request("PUT", &uri, token, json!({ "score": 5, "status": "excellent" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send(json_request("PUT", &uri, token, json!({ "score": 5, "status": "late" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = app
            .send(json_request("PUT", &grade_uri(&data, 9999), token, json!({ "score": 5 })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn only_the_course_teacher_may_grade() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let id = submitted(&app.db, &data, NewActivity::new(data.course.id, "Essay", 100)).await;
        let uri = grade_uri(&data, id);
        let body = json!({ "score": 50 });

        let (status, _) = app.send(json_request("PUT", &uri, Some(&data.student_token), body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, other) = user(&app.db, "other", UserRole::Teacher).await;
        let (status, json) = app.send(json_request("PUT", &uri, Some(&other), body.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["success"], false);

        let (_, admin) = user(&app.db, "admin", UserRole::Admin).await;
        let (status, _) = app.send(json_request("PUT", &uri, Some(&admin), body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn returned_work_can_be_graded_later() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let id = submitted(&app.db, &data, NewActivity::new(data.course.id, "Essay", 100)).await;
        let uri = grade_uri(&data, id);
        let token = Some(data.teacher_token.as_str());

        let (status, json) = app
            .send(json_request("PUT", &uri, token, json!({ "status": "returned", "feedback": "Please cite sources" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["submission"]["status"], "returned");
        assert_eq!(json["data"]["submission"]["gradedAt"], serde_json::Value::Null);

        let (status, json) = app.send(json_request("PUT", &uri, token, json!({ "score": 80 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["submission"]["status"], "graded");

        let (status, _) = app
            .send(json_request("PUT", &uri, token, json!({ "status": "returned" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    #[serial]
    async fn late_penalty_is_reported_or_applied() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;

        let mut new = NewActivity::new(data.course.id, "Late essay", 100);
        new.due_date = Some(Utc::now() - Duration::days(2));
        new.allow_late = true;
        new.late_penalty = 25;
        let id = submitted(&app.db, &data, new).await;
        let uri = grade_uri(&data, id);
        let token = Some(data.teacher_token.as_str());

        let (_, json) = app.send(json_request("PUT", &uri, token, json!({ "score": 80 }))).await;
        assert_eq!(json["data"]["submission"]["score"], 80);
        assert_eq!(json["data"]["latePenalty"], 25);
        assert_eq!(json["data"]["penaltyApplied"], false);

        AppConfig::set_late_penalty_mode(LatePenaltyMode::Automatic);
        let (_, json) = app.send(json_request("PUT", &uri, token, json!({ "score": 80 }))).await;
        AppConfig::set_late_penalty_mode(LatePenaltyMode::Advisory);

        assert_eq!(json["data"]["submission"]["score"], 60);
        assert_eq!(json["data"]["rawScore"], 80);
        assert_eq!(json["data"]["penaltyApplied"], true);
    }
}
