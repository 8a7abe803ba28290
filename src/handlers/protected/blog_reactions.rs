// handlers/protected/blog_reactions.rs - Likes on published blogs

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Blog;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeCount {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub like_count: i64,
}

impl From<Blog> for LikeCount {
    fn from(blog: Blog) -> Self {
        Self { id: blog.id, like_count: blog.like_count }
    }
}

/// POST /student/blog/like/:id
pub async fn blog_like(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<LikeCount> {
    let blog = state.blogs.like(&user, &id).await?;
    Ok(ApiResponse::success(LikeCount::from(blog)))
}

/// POST /student/blog/unlike/:id - never drops below zero
pub async fn blog_unlike(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<LikeCount> {
    let blog = state.blogs.unlike(&user, &id).await?;
    Ok(ApiResponse::success(LikeCount::from(blog)))
}
