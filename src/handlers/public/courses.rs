// handlers/public/courses.rs - Student course catalogue

use axum::extract::{Path, Query, State};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Course;
use crate::services::CourseListParams;

/// GET /courses/get - list courses, filtered and sorted by query string
pub async fn course_list(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> ApiResult<Vec<Course>> {
    let courses = state.courses.list(&params).await?;
    Ok(ApiResponse::success(courses))
}

/// GET /courses/get/details/:id - single course with curriculum
pub async fn course_details(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Course> {
    let course = state.courses.details(&id).await?;
    Ok(ApiResponse::success(course))
}

/// GET /courses/purchase-info/:id/:studentId - whether the student owns the course
pub async fn course_purchase_info(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> ApiResult<bool> {
    let owned = state.enrollment.purchase_info(&course_id, &student_id).await?;
    Ok(ApiResponse::success(owned))
}
