// handlers/protected/instructor_blogs.rs - Instructor blog management
//
// Every operation is scoped to the caller: another instructor's blog is
// reported as not found.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Blog, BlogInput};
use crate::services::BlogListParams;

/// GET /instructor/blog/get - caller's blogs, optional `status` and `category`
pub async fn instructor_blog_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BlogListParams>,
) -> ApiResult<Vec<Blog>> {
    let page = state.blogs.list_instructor_blogs(&user, &params).await?;
    Ok(ApiResponse::page(page))
}

/// GET /instructor/blog/get/details/:id
pub async fn instructor_blog_details(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Blog> {
    let blog = state.blogs.get_instructor_blog(&user, &id).await?;
    Ok(ApiResponse::success(blog))
}

/// POST /instructor/blog/add
pub async fn instructor_blog_add(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<BlogInput>,
) -> ApiResult<Blog> {
    let blog = state.blogs.create_blog(&user, input).await?;
    Ok(ApiResponse::created(blog).with_message("Blog created successfully"))
}

/// PUT /instructor/blog/update/:id - partial update
pub async fn instructor_blog_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<BlogInput>,
) -> ApiResult<Blog> {
    let blog = state.blogs.update_blog(&user, &id, input).await?;
    Ok(ApiResponse::success(blog).with_message("Blog updated successfully"))
}

/// DELETE /instructor/blog/delete/:id
pub async fn instructor_blog_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.blogs.delete_blog(&user, &id).await?;
    Ok(ApiResponse::success(()).with_message("Blog deleted successfully"))
}
