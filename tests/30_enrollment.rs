mod common;

use anyhow::Result;
use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use course_api::store::EnrollmentStore;

use common::{course, token_for, TestApp};

fn app() -> TestApp {
    TestApp::new(vec![course("free-1", "Free Intro", 0.0), course("paid-1", "Paid Pro", 49.99)])
}

#[tokio::test]
async fn free_enrollment_updates_record_and_course() -> Result<()> {
    let app = app();
    let token = token_for("s1");

    let (status, body) = app
        .post_as("/courses/enroll-free", &token, json!({ "userId": "s1", "courseId": "free-1" }))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully enrolled in free course");
    assert_eq!(body["data"], json!({ "courseId": "free-1", "courseTitle": "Free Intro" }));

    let (_, info) = app.get("/courses/purchase-info/free-1/s1").await?;
    assert_eq!(info["data"], true);

    let (_, details) = app.get("/courses/get/details/free-1").await?;
    let students = details["data"]["students"].as_array().cloned().unwrap_or_default();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["studentId"], "s1");
    assert_eq!(students[0]["studentEmail"], "s1@example.com");
    Ok(())
}

#[tokio::test]
async fn repeat_enrollment_is_rejected_without_side_effects() -> Result<()> {
    let app = app();
    let token = token_for("s1");
    let body = json!({ "courseId": "free-1" });

    app.post_as("/courses/enroll-free", &token, body.clone()).await?;
    let (status, response) = app.post_as("/courses/enroll-free", &token, body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({ "success": false, "message": "You are already enrolled in this course" }));

    let (_, details) = app.get("/courses/get/details/free-1").await?;
    assert_eq!(details["data"]["students"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn paid_and_unknown_courses_are_rejected() -> Result<()> {
    let app = app();
    let token = token_for("s1");

    let (status, body) = app
        .post_as("/courses/enroll-free", &token, json!({ "courseId": "paid-1" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This course is not free");

    let (status, body) = app
        .post_as("/courses/enroll-free", &token, json!({ "courseId": "ghost" }))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Course not found");

    let (_, info) = app.get("/courses/purchase-info/paid-1/s1").await?;
    assert_eq!(info["data"], false);
    Ok(())
}

#[tokio::test]
async fn paid_course_leaves_existing_record_untouched() -> Result<()> {
    let app = app();
    let token = token_for("s1");

    let (status, _) = app
        .post_as("/courses/enroll-free", &token, json!({ "courseId": "free-1" }))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post_as("/courses/enroll-free", &token, json!({ "courseId": "paid-1" }))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "This course is not free");

    let record = app.store.find_enrollment("s1").await?.expect("record exists");
    assert_eq!(record.courses.len(), 1);
    assert_eq!(record.courses[0].course_id, "free-1");

    let (_, info) = app.get("/courses/purchase-info/free-1/s1").await?;
    assert_eq!(info["data"], true);
    let (_, info) = app.get("/courses/purchase-info/paid-1/s1").await?;
    assert_eq!(info["data"], false);
    Ok(())
}

#[tokio::test]
async fn cannot_enroll_someone_else() -> Result<()> {
    let app = app();

    let (status, _) = app
        .post_as(
            "/courses/enroll-free",
            &token_for("s1"),
            json!({ "userId": "s2", "courseId": "free-1" }),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, info) = app.get("/courses/purchase-info/free-1/s2").await?;
    assert_eq!(info["data"], false);
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_enroll_once() -> Result<()> {
    let app = app();
    let token = token_for("s1");

    let attempts = (0..10).map(|_| {
        app.post_as("/courses/enroll-free", &token, json!({ "courseId": "free-1" }))
    });
    let results = join_all(attempts).await;

    let mut ok = 0;
    let mut rejected = 0;
    for result in results {
        let (status, body) = result?;
        match status {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => {
                assert_eq!(body["message"], "You are already enrolled in this course");
                rejected += 1;
            }
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!((ok, rejected), (1, 9));

    let (_, details) = app.get("/courses/get/details/free-1").await?;
    assert_eq!(details["data"]["students"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn separate_students_both_enroll() -> Result<()> {
    let app = app();

    for student in ["s1", "s2"] {
        let (status, _) = app
            .post_as("/courses/enroll-free", &token_for(student), json!({ "courseId": "free-1" }))
            .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, details) = app.get("/courses/get/details/free-1").await?;
    assert_eq!(details["data"]["students"].as_array().map(Vec::len), Some(2));
    Ok(())
}
