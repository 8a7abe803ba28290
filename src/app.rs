use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::HeaderValue,
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig, StorageBackend};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, ApiResponse, ApiResult};
use crate::services::{BlogLimits, BlogService, CourseService, EnrollmentService};
use crate::store::{CourseStore, Stores};

/// Shared handler state: one service per area plus a handle for health probes.
#[derive(Clone)]
pub struct AppState {
    pub courses: CourseService,
    pub enrollment: EnrollmentService,
    pub blogs: BlogService,
    pub health: Arc<dyn CourseStore>,
    pub backend: StorageBackend,
}

impl AppState {
    pub fn new(stores: Stores, config: &AppConfig) -> Self {
        Self {
            courses: CourseService::new(stores.courses.clone()),
            enrollment: EnrollmentService::new(stores.courses.clone(), stores.enrollments.clone()),
            blogs: BlogService::new(stores.blogs.clone(), BlogLimits::from(&config.api)),
            health: stores.courses,
            backend: config.storage.backend,
        }
    }
}

/// Full application router with global layers applied.
pub fn router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/courses", course_routes())
        .nest("/student/course", course_routes())
        .nest("/student/blog", student_blog_routes())
        .nest("/instructor/blog", instructor_blog_routes())
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn course_routes() -> Router<AppState> {
    let authenticated = Router::new()
        .route("/enroll-free", post(protected::enroll_free_course))
        .route_layer(from_fn(jwt_auth_middleware));

    Router::new()
        .route("/get", get(public::course_list))
        .route("/get/details/:id", get(public::course_details))
        .route("/purchase-info/:id/:student_id", get(public::course_purchase_info))
        .merge(authenticated)
}

fn student_blog_routes() -> Router<AppState> {
    let authenticated = Router::new()
        .route("/like/:id", post(protected::blog_like))
        .route("/unlike/:id", post(protected::blog_unlike))
        .route_layer(from_fn(jwt_auth_middleware));

    Router::new()
        .route("/get", get(public::blog_list))
        .route("/get/details/:id", get(public::blog_details))
        .route("/category/:category", get(public::blogs_by_category))
        .route("/tag/:tag", get(public::blogs_by_tag))
        .route("/popular", get(public::popular_blogs))
        .route("/recent", get(public::recent_blogs))
        .route("/search", get(public::search_blogs))
        .merge(authenticated)
}

fn instructor_blog_routes() -> Router<AppState> {
    Router::new()
        .route("/get", get(protected::instructor_blog_list))
        .route("/get/details/:id", get(protected::instructor_blog_details))
        .route("/add", post(protected::instructor_blog_add))
        .route("/update/:id", put(protected::instructor_blog_update))
        .route("/delete/:id", delete(protected::instructor_blog_delete))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        // No allowed origins: browsers get no CORS headers
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

async fn root(State(state): State<AppState>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage_name(state.backend),
    })))
}

async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    if let Err(e) = state.health.ping().await {
        tracing::error!("Health check failed: {}", e);
        return Err(ApiError::service_unavailable("Storage unavailable"));
    }
    Ok(ApiResponse::success(json!({
        "status": "ok",
        "storage": storage_name(state.backend),
    })))
}

fn storage_name(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    }
}
