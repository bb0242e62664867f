#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::json_request,
        fixtures::{enroll, published, setup, user},
        make_test_app,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{Duration, Utc};
    use db::models::{
        activity::{Model as ActivityModel, NewActivity},
        user::UserRole,
    };
    use serde_json::json;
    use serial_test::serial;

    fn submissions_uri(course_id: i64, activity_id: i64) -> String {
        format!("/api/courses/{course_id}/activities/{activity_id}/submissions")
    }

    #[tokio::test]
    #[serial]
    async fn attempts_are_numbered_and_capped() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;

        let mut new = NewActivity::new(data.course.id, "Grammar quiz", 10);
        new.max_attempts = Some(2);
        let activity = published(&app.db, new).await;
        let uri = submissions_uri(data.course.id, activity.id);
        let token = Some(data.student_token.as_str());

        for expected in 1..=2 {
            let (status, json) = app
                .send(json_request("POST", &uri, token, json!({ "submissionText": "my answer" })))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(json["data"]["attemptNumber"], expected);
            assert_eq!(json["data"]["status"], "submitted");
            assert_eq!(json["data"]["files"], json!([]));
        }

        let (status, json) = app
            .send(json_request("POST", &uri, token, json!({ "submissionText": "third" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Maximum number of attempts (2) reached");
    }

    #[tokio::test]
    #[serial]
    async fn late_window_follows_allow_late() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let token = Some(data.student_token.as_str());

        let mut open = NewActivity::new(data.course.id, "Reflection", 10);
        open.due_date = Some(Utc::now() - Duration::days(1));
        open.allow_late = true;
        open.late_penalty = 20;
        let open = published(&app.db, open).await;

        let mut closed = NewActivity::new(data.course.id, "Exam", 10);
        closed.due_date = Some(Utc::now() - Duration::days(1));
        let closed = published(&app.db, closed).await;

        let (status, json) = app
            .send(json_request("POST", &submissions_uri(data.course.id, open.id), token, json!({ "submissionText": "late" })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "late");

        let (status, json) = app
            .send(json_request("POST", &submissions_uri(data.course.id, closed.id), token, json!({ "submissionText": "late" })))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "The submission window for this activity has closed");
    }

    #[tokio::test]
    #[serial]
    async fn rejects_empty_unpublished_and_unenrolled() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let token = Some(data.student_token.as_str());

        let activity = published(&app.db, NewActivity::new(data.course.id, "Essay", 100)).await;
        let draft = ActivityModel::create(&app.db, NewActivity::new(data.course.id, "Draft", 100))
            .await
            .unwrap();
        let uri = submissions_uri(data.course.id, activity.id);

        let (status, json) = app
            .send(json_request("POST", &uri, token, json!({ "submissionText": "hi" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "You are not enrolled in this course");

        enroll(&app.db, data.student.id, data.course.id).await;

        let (status, _) = app
            .send(json_request("POST", &uri, token, json!({ "submissionText": "   ", "files": [] })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send(json_request("POST", &submissions_uri(data.course.id, draft.id), token, json!({ "submissionText": "hi" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .send(json_request("POST", &uri, Some(&data.teacher_token), json!({ "submissionText": "hi" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_file_metadata_is_rejected() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Essay", 100)).await;

        let body = json!({
            "files": [{ "name": "", "url": "/files/x", "mimeType": "text/plain", "sizeBytes": 3 }]
        });
        let (status, json) = app
            .send(json_request("POST", &submissions_uri(data.course.id, activity.id), Some(&data.student_token), body))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn malformed_bodies_keep_the_envelope() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Essay", 100)).await;

        let request = Request::builder()
            .method("POST")
            .uri(submissions_uri(data.course.id, activity.id))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", data.student_token))
            .body(Body::from("{\"submissionText\": "))
            .unwrap();
        let (status, json) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));

        let (status, json) = app
            .send(json_request(
                "POST",
                &submissions_uri(data.course.id, activity.id),
                Some(&data.student_token),
                json!({ "submissionText": 42 }),
            ))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn listing_depends_on_the_caller() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let (peer, peer_token) = user(&app.db, "peer", UserRole::Student).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        enroll(&app.db, peer.id, data.course.id).await;

        let activity = published(&app.db, NewActivity::new(data.course.id, "Essay", 100)).await;
        let uri = submissions_uri(data.course.id, activity.id);

        app.send(json_request("POST", &uri, Some(&data.student_token), json!({ "submissionText": "one" }))).await;
        app.send(json_request("POST", &uri, Some(&data.student_token), json!({ "submissionText": "two" }))).await;
        app.send(json_request("POST", &uri, Some(&peer_token), json!({ "submissionText": "peer" }))).await;

        let (status, json) = app.send(json_request("GET", &uri, Some(&data.student_token), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let own = json["data"].as_array().unwrap();
        assert_eq!(own.len(), 2);
        assert_eq!(own[0]["attemptNumber"], 1);
        assert_eq!(own[1]["submissionText"], "two");

        let (status, json) = app.send(json_request("GET", &uri, Some(&data.teacher_token), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);

        let (_, other_teacher) = user(&app.db, "other", UserRole::Teacher).await;
        let (status, _) = app.send(json_request("GET", &uri, Some(&other_teacher), json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
