#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use course_api::app::{router, AppState};
use course_api::auth::{generate_jwt, AuthUser, Claims};
use course_api::config::{config, StorageBackend};
use course_api::models::Course;
use course_api::store::{MemoryStore, Stores};

/// Router over a fresh in-memory store, driven in-process with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new(courses: Vec<Course>) -> Self {
        let mut app_config = config().clone();
        app_config.storage.backend = StorageBackend::Memory;

        let store = Arc::new(MemoryStore::with_courses(courses));
        let state = AppState::new(Stores::shared(store.clone()), &app_config);
        Self { router: router(state, &app_config), store }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("reading response body")?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("non-JSON response: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_as(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post_as(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put_as(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete_as(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, uri, Some(token), None).await
    }
}

/// Bearer token for `user_id` signed with the configured secret.
pub fn token_for(user_id: &str) -> String {
    let claims = Claims::for_user(&AuthUser {
        user_id: user_id.to_string(),
        user_name: format!("User {}", user_id),
        user_email: format!("{}@example.com", user_id),
        role: "user".to_string(),
    });
    generate_jwt(&claims).expect("token generation")
}

/// Course fixture in wire format.
pub fn course(id: &str, title: &str, pricing: f64) -> Course {
    course_with(id, title, pricing, json!({}))
}

/// Course fixture with extra wire fields merged in.
pub fn course_with(id: &str, title: &str, pricing: f64, extra: Value) -> Course {
    let mut value = json!({
        "_id": id,
        "instructorId": "instructor-1",
        "instructorName": "Ada Lovelace",
        "title": title,
        "category": "web-development",
        "level": "beginner",
        "primaryLanguage": "english",
        "image": format!("https://cdn.example.com/{}.png", id),
        "pricing": pricing,
        "isPublised": true,
        "curriculum": [
            { "title": "Welcome", "videoUrl": "https://cdn.example.com/v.mp4", "public_id": "v1", "freePreview": true }
        ]
    });
    if let (Some(base), Value::Object(extra)) = (value.as_object_mut(), extra) {
        base.extend(extra);
    }
    serde_json::from_value(value).expect("valid course fixture")
}

/// Minimal valid blog body for the instructor create endpoint.
pub fn blog_body(title: &str) -> Value {
    json!({
        "title": title,
        "summary": format!("Summary of {}", title),
        "content": format!("<p>{}</p>", title),
        "author": "Ada",
        "category": "Công nghệ",
        "tags": ["rust", "web"],
        "status": "published"
    })
}
