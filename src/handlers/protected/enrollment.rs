// handlers/protected/enrollment.rs - POST /courses/enroll-free

use axum::{extract::State, Extension, Json};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{EnrollFreeCourseRequest, EnrollmentReceipt};

/// POST /courses/enroll-free - enroll the caller in a free course
pub async fn enroll_free_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<EnrollFreeCourseRequest>,
) -> ApiResult<EnrollmentReceipt> {
    let receipt = state.enrollment.enroll_free(&user, body).await?;
    Ok(ApiResponse::success(receipt).with_message("Successfully enrolled in free course"))
}
