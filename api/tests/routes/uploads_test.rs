#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::{empty_request, json_request},
        fixtures::{enroll, published, setup, user},
        make_test_app,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::models::{activity::NewActivity, user::UserRole};
    use serde_json::json;
    use serial_test::serial;

    const BOUNDARY: &str = "----lmsTestBoundary";

    fn multipart_request(uri: &str, token: &str, files: &[(&str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, bytes) in files {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n")
                    .as_bytes(),
            );
            body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn stored_file_count(dir: &std::path::Path) -> usize {
        let mut count = 0;
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                count += stored_file_count(&path);
            } else {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    #[serial]
    async fn uploaded_files_can_be_submitted() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Portfolio", 50)).await;

        let upload_uri = format!("/api/courses/{}/activities/{}/uploads", data.course.id, activity.id);
        let (status, json) = app
            .send(multipart_request(
                &upload_uri,
                &data.student_token,
                &[("essay.pdf", b"%PDF-1.4 essay"), ("notes.txt", b"notes")],
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let files = json["data"].clone();
        assert_eq!(files.as_array().unwrap().len(), 2);
        assert_eq!(files[0]["name"], "essay.pdf");
        assert_eq!(files[0]["mimeType"], "application/pdf");
        assert_eq!(files[1]["sizeBytes"], 5);
        let expected_prefix = format!(
            "/files/course_{}/activity_{}/student_{}/",
            data.course.id, activity.id, data.student.id
        );
        assert!(files[0]["url"].as_str().unwrap().starts_with(&expected_prefix));
        assert_eq!(stored_file_count(app.storage_dir.path()), 2);

        let submit_uri = format!("/api/courses/{}/activities/{}/submissions", data.course.id, activity.id);
        let (status, json) = app
            .send(json_request("POST", &submit_uri, Some(&data.student_token), json!({ "files": files })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["submissionText"], serde_json::Value::Null);
        assert_eq!(json["data"]["files"][0]["fileName"], "essay.pdf");
        assert_eq!(json["data"]["files"][0]["position"], 0);
        assert_eq!(json["data"]["files"][1]["fileName"], "notes.txt");
    }

    #[tokio::test]
    #[serial]
    async fn one_bad_part_stores_nothing() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Portfolio", 50)).await;
        let uri = format!("/api/courses/{}/activities/{}/uploads", data.course.id, activity.id);

        let (status, json) = app
            .send(multipart_request(&uri, &data.student_token, &[("a.txt", b"fine"), ("b.txt", b"")]))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(stored_file_count(app.storage_dir.path()), 0);

        let (status, _) = app.send(multipart_request(&uri, &data.student_token, &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn uploads_are_refused_when_the_student_cannot_submit() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Portfolio", 50)).await;
        let uri = format!("/api/courses/{}/activities/{}/uploads", data.course.id, activity.id);

        let (status, _) = app
            .send(multipart_request(&uri, &data.student_token, &[("a.txt", b"text")]))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(stored_file_count(app.storage_dir.path()), 0);
    }

    #[tokio::test]
    #[serial]
    async fn only_the_callers_own_uploads_can_be_attached() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let (peer, peer_token) = user(&app.db, "peer", UserRole::Student).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        enroll(&app.db, peer.id, data.course.id).await;
        let activity = published(&app.db, NewActivity::new(data.course.id, "Portfolio", 50)).await;

        let upload_uri = format!("/api/courses/{}/activities/{}/uploads", data.course.id, activity.id);
        let (status, json) = app
            .send(multipart_request(&upload_uri, &peer_token, &[("peer.pdf", b"%PDF-1.4 peer")]))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let peer_files = json["data"].clone();

        let submit_uri = format!("/api/courses/{}/activities/{}/submissions", data.course.id, activity.id);
        let (status, json) = app
            .send(json_request("POST", &submit_uri, Some(&data.student_token), json!({ "files": peer_files })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);

        let made_up = json!({
            "files": [{
                "name": "other.pdf",
                "url": format!("/files/course_{}/activity_{}/student_{}/other.pdf", data.course.id, activity.id, data.student.id),
                "mimeType": "application/pdf",
                "sizeBytes": 10
            }]
        });
        let (status, json) = app
            .send(json_request("POST", &submit_uri, Some(&data.student_token), made_up))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, json) = app
            .send(empty_request("GET", &submit_uri, Some(&data.student_token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }
}
