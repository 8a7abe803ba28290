// handlers/public/blogs.rs - Published blogs for students

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Blog, BlogSummary};
use crate::services::BlogListParams;

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<String>,
}

/// GET /student/blog/get - published blogs, optional `category` and `search`
pub async fn blog_list(
    State(state): State<AppState>,
    Query(params): Query<BlogListParams>,
) -> ApiResult<Vec<BlogSummary>> {
    let page = state.blogs.list_published(&params).await?;
    Ok(ApiResponse::page(page))
}

/// GET /student/blog/get/details/:id - full published blog; counts a view
pub async fn blog_details(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Blog> {
    let blog = state.blogs.view_published(&id).await?;
    Ok(ApiResponse::success(blog))
}

/// GET /student/blog/category/:category
pub async fn blogs_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<BlogListParams>,
) -> ApiResult<Vec<BlogSummary>> {
    let page = state.blogs.list_by_category(&category, &params).await?;
    Ok(ApiResponse::page(page))
}

/// GET /student/blog/tag/:tag
pub async fn blogs_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Query(params): Query<BlogListParams>,
) -> ApiResult<Vec<BlogSummary>> {
    let page = state.blogs.list_by_tag(&tag, &params).await?;
    Ok(ApiResponse::page(page))
}

/// GET /student/blog/popular - most viewed first
pub async fn popular_blogs(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> ApiResult<Vec<BlogSummary>> {
    let blogs = state.blogs.popular(query.limit.as_deref()).await?;
    Ok(ApiResponse::success(blogs))
}

/// GET /student/blog/recent - newest first
pub async fn recent_blogs(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> ApiResult<Vec<BlogSummary>> {
    let blogs = state.blogs.recent(query.limit.as_deref()).await?;
    Ok(ApiResponse::success(blogs))
}

/// GET /student/blog/search?q= - case-insensitive text search
pub async fn search_blogs(
    State(state): State<AppState>,
    Query(params): Query<BlogListParams>,
) -> ApiResult<Vec<BlogSummary>> {
    let page = state.blogs.search(&params).await?;
    Ok(ApiResponse::page(page))
}
