mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{course, course_with, TestApp};

fn ids(body: &Value) -> Vec<&str> {
    body["data"]
        .as_array()
        .map(|items| items.iter().filter_map(|c| c["_id"].as_str()).collect())
        .unwrap_or_default()
}

fn catalogue() -> TestApp {
    TestApp::new(vec![
        course("c1", "Beta", 30.0),
        course("c2", "Alpha", 10.0),
        course_with("c3", "Gamma", 20.0, json!({ "level": "advanced", "category": "data-science" })),
        course_with("c4", "Delta", 0.0, json!({ "primaryLanguage": "spanish" })),
    ])
}

#[tokio::test]
async fn list_defaults_to_price_ascending() -> Result<()> {
    let app = catalogue();

    let (status, body) = app.get("/courses/get").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec!["c4", "c2", "c3", "c1"]);
    assert!(body.get("pagination").is_none());
    Ok(())
}

#[tokio::test]
async fn list_filters_and_sorts() -> Result<()> {
    let app = catalogue();

    let (_, body) = app.get("/courses/get?sortBy=title-atoz").await?;
    assert_eq!(ids(&body), vec!["c2", "c1", "c4", "c3"]);

    let (_, body) = app.get("/courses/get?sortBy=price-hightolow&level=beginner").await?;
    assert_eq!(ids(&body), vec!["c1", "c2", "c4"]);

    let (_, body) = app
        .get("/courses/get?category=web-development,data-science&primaryLanguage=english")
        .await?;
    assert_eq!(ids(&body), vec!["c2", "c3", "c1"]);

    let (_, body) = app.get("/courses/get?sortBy=bogus&level=expert").await?;
    assert!(ids(&body).is_empty());
    Ok(())
}

#[tokio::test]
async fn details_use_wire_field_names() -> Result<()> {
    let app = catalogue();

    let (status, body) = app.get("/courses/get/details/c4").await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["_id"], "c4");
    assert_eq!(data["isPublised"], true);
    assert_eq!(data["primaryLanguage"], "spanish");
    assert_eq!(data["curriculum"][0]["public_id"], "v1");
    assert_eq!(data["curriculum"][0]["freePreview"], true);
    Ok(())
}

#[tokio::test]
async fn missing_details_return_null_data() -> Result<()> {
    let app = catalogue();

    let (status, body) = app.get("/courses/get/details/nope").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "No course details found", "data": null }));
    Ok(())
}

#[tokio::test]
async fn purchase_info_without_record_is_false() -> Result<()> {
    let app = catalogue();

    let (status, body) = app.get("/courses/purchase-info/c1/student-9").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": false }));
    Ok(())
}

#[tokio::test]
async fn legacy_student_course_prefix_still_routes() -> Result<()> {
    let app = catalogue();

    let (status, body) = app.get("/student/course/get").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["c4", "c2", "c3", "c1"]);

    let (status, _) = app.get("/student/course/get/details/c2").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
