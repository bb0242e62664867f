#[cfg(test)]
mod tests {
    use crate::helpers::{
        app::empty_request,
        fixtures::{TestData, enroll, published, setup, user},
        make_test_app,
    };
    use axum::http::StatusCode;
    use db::models::{
        activity::{Model as ActivityModel, NewActivity},
        course::Model as CourseModel,
        submission::SubmissionStatus,
        user::UserRole,
    };
    use sea_orm::DatabaseConnection;
    use serial_test::serial;
    use services::{
        access::Actor,
        submission_service::{NewSubmission, SubmissionService},
        submission_state::GradeRequest,
    };

    async fn attempt_graded(db: &DatabaseConnection, data: &TestData, activity: &ActivityModel, score: i32) {
        let created = SubmissionService::submit(
            db,
            data.student.id,
            NewSubmission {
                course_id: activity.course_id,
                activity_id: activity.id,
                submission_text: Some("answer".into()),
                files: Vec::new(),
            },
        )
        .await
        .unwrap();
        SubmissionService::grade(
            db,
            &Actor::new(data.teacher.id, UserRole::Teacher),
            activity.course_id,
            created.submission.id,
            GradeRequest {
                status: SubmissionStatus::Graded,
                score: Some(score),
                feedback: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    #[serial]
    async fn best_attempt_counts_once() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;

        let essay = published(&app.db, NewActivity::new(data.course.id, "Essay", 100)).await;
        let quiz = published(&app.db, NewActivity::new(data.course.id, "Quiz", 10)).await;
        published(&app.db, NewActivity::new(data.course.id, "Not attempted", 10)).await;

        attempt_graded(&app.db, &data, &essay, 50).await;
        attempt_graded(&app.db, &data, &essay, 85).await;
        attempt_graded(&app.db, &data, &quiz, 3).await;

        let uri = format!("/api/courses/{}/progress", data.course.id);
        let (status, json) = app.send(empty_request("GET", &uri, Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(json["data"]["passed"], 1);
        assert_eq!(json["data"]["percentage"], 50);

        let teacher_uri = format!("/api/courses/{}/students/{}/progress", data.course.id, data.student.id);
        let (status, teacher_view) = app.send(empty_request("GET", &teacher_uri, Some(&data.teacher_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(teacher_view["data"], json["data"]);
    }

    #[tokio::test]
    #[serial]
    async fn no_graded_work_means_zero_progress() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        enroll(&app.db, data.student.id, data.course.id).await;
        for i in 0..5 {
            published(&app.db, NewActivity::new(data.course.id, &format!("Unit {i}"), 10)).await;
        }

        let uri = format!("/api/courses/{}/progress", data.course.id);
        let (status, json) = app.send(empty_request("GET", &uri, Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 0);
        assert_eq!(json["data"]["percentage"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn my_progress_lists_active_courses() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;
        let second = CourseModel::create(&app.db, "ENG202", "Public Speaking", None, data.teacher.id)
            .await
            .unwrap();
        let third = CourseModel::create(&app.db, "ENG303", "Poetry", None, data.teacher.id)
            .await
            .unwrap();
        enroll(&app.db, data.student.id, data.course.id).await;
        enroll(&app.db, data.student.id, second.id).await;

        let speech = published(&app.db, NewActivity::new(second.id, "Speech", 20)).await;
        attempt_graded(&app.db, &data, &speech, 20).await;

        let (status, json) = app.send(empty_request("GET", "/api/me/progress", Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::OK);
        let courses = json["data"].as_array().unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0]["courseId"], data.course.id);
        assert_eq!(courses[0]["percentage"], 0);
        assert_eq!(courses[1]["courseTitle"], "Public Speaking");
        assert_eq!(courses[1]["passed"], 1);
        assert_eq!(courses[1]["percentage"], 100);
        assert!(courses.iter().all(|c| c["courseId"] != third.id));

        let (status, _) = app.send(empty_request("GET", "/api/me/progress", Some(&data.teacher_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn progress_requires_enrollment_and_ownership() {
        let app = make_test_app().await;
        let data = setup(&app.db).await;

        let uri = format!("/api/courses/{}/progress", data.course.id);
        let (status, _) = app.send(empty_request("GET", &uri, Some(&data.student_token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let teacher_uri = format!("/api/courses/{}/students/{}/progress", data.course.id, data.student.id);
        let (status, _) = app.send(empty_request("GET", &teacher_uri, Some(&data.teacher_token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        enroll(&app.db, data.student.id, data.course.id).await;
        let (_, other) = user(&app.db, "other", UserRole::Teacher).await;
        let (status, _) = app.send(empty_request("GET", &teacher_uri, Some(&other))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
