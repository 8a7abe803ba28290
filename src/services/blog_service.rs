use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::AuthUser;
use crate::config::ApiConfig;
use crate::models::blog::is_valid_image_url;
use crate::models::{
    Blog, BlogCategory, BlogInput, BlogQuery, BlogSort, BlogStatus, BlogSummary, Page,
    PageRequest, Pagination, TextSearch,
};
use crate::store::BlogStore;

const NOT_FOUND: &str = "Blog not found";
const NOT_PUBLISHED: &str = "Blog not found or not published";

/// Paging and size limits applied to blog operations.
#[derive(Debug, Clone, Copy)]
pub struct BlogLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub featured_limit: u32,
    pub max_tags: usize,
}

impl From<&ApiConfig> for BlogLimits {
    fn from(api: &ApiConfig) -> Self {
        Self {
            default_page_size: api.default_page_size,
            max_page_size: api.max_page_size,
            featured_limit: api.featured_limit,
            max_tags: api.max_tags,
        }
    }
}

/// Query string shared by the blog list endpoints. Values stay raw strings so
/// that bad input is reported by the service rather than the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub q: Option<String>,
}

/// Parsed filter value. An unrecognized category or status matches nothing.
enum Criterion<T> {
    Any,
    Only(T),
    Unmatchable,
}

fn criterion<T>(raw: Option<&str>, parse: fn(&str) -> Option<T>) -> Criterion<T> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Criterion::Any,
        Some(value) => match parse(value) {
            Some(parsed) => Criterion::Only(parsed),
            None => Criterion::Unmatchable,
        },
    }
}

#[derive(Clone)]
pub struct BlogService {
    blogs: Arc<dyn BlogStore>,
    limits: BlogLimits,
}

impl BlogService {
    pub fn new(blogs: Arc<dyn BlogStore>, limits: BlogLimits) -> Self {
        Self { blogs, limits }
    }

    fn page_request(&self, params: &BlogListParams) -> ServiceResult<PageRequest> {
        PageRequest::parse(
            params.page.as_deref(),
            params.limit.as_deref(),
            self.limits.default_page_size,
            self.limits.max_page_size,
        )
        .map_err(ServiceError::InvalidRequest)
    }

    fn featured_limit(&self, raw: Option<&str>) -> ServiceResult<u32> {
        PageRequest::parse(None, raw, self.limits.featured_limit, self.limits.max_page_size)
            .map(|req| req.limit)
            .map_err(ServiceError::InvalidRequest)
    }

    async fn page(&self, query: BlogQuery, request: PageRequest) -> ServiceResult<Page<Blog>> {
        Ok(self.blogs.list_blogs(&query, request).await?)
    }

    async fn owned_blog(&self, caller: &AuthUser, id: &str) -> ServiceResult<Blog> {
        let blog = match Uuid::parse_str(id) {
            Ok(id) => self.blogs.find_blog(id).await?,
            Err(_) => None,
        };
        blog.filter(|b| b.instructor_id == caller.user_id)
            .ok_or_else(|| ServiceError::not_found(NOT_FOUND))
    }

    /// Title, image and tag checks shared by create and update, in the order
    /// clients expect them reported.
    async fn check_input(
        &self,
        caller: &AuthUser,
        input: &BlogInput,
        existing: Option<&Blog>,
    ) -> ServiceResult<()> {
        if let Some(title) = input.normalized_title().filter(|t| !t.is_empty()) {
            let changed = existing.map_or(true, |b| b.title != title);
            if changed
                && self
                    .blogs
                    .title_taken(&caller.user_id, &title, existing.map(|b| b.id))
                    .await?
            {
                return Err(ServiceError::invalid("A blog with this title already exists"));
            }
        }

        if let Some(image) = input.image.as_deref().filter(|i| !i.is_empty()) {
            if !is_valid_image_url(image) {
                return Err(ServiceError::invalid("Invalid image URL format"));
            }
        }

        if input.tags.as_ref().is_some_and(|t| t.len() > self.limits.max_tags) {
            return Err(ServiceError::invalid(format!(
                "Cannot have more than {} tags",
                self.limits.max_tags
            )));
        }
        Ok(())
    }

    // Instructor operations

    pub async fn list_instructor_blogs(
        &self,
        caller: &AuthUser,
        params: &BlogListParams,
    ) -> ServiceResult<Page<Blog>> {
        let request = self.page_request(params)?;
        let status = criterion(params.status.as_deref(), BlogStatus::parse);
        let category = criterion(params.category.as_deref(), BlogCategory::parse);
        let mut query = BlogQuery { instructor_id: Some(caller.user_id.clone()), ..Default::default() };

        match status {
            Criterion::Any => {}
            Criterion::Only(s) => query.status = Some(s),
            Criterion::Unmatchable => return Ok(empty_page(request)),
        }
        match category {
            Criterion::Any => {}
            Criterion::Only(c) => query.category = Some(c),
            Criterion::Unmatchable => return Ok(empty_page(request)),
        }
        self.page(query, request).await
    }

    pub async fn get_instructor_blog(&self, caller: &AuthUser, id: &str) -> ServiceResult<Blog> {
        self.owned_blog(caller, id).await
    }

    pub async fn create_blog(&self, caller: &AuthUser, input: BlogInput) -> ServiceResult<Blog> {
        self.check_input(caller, &input, None).await?;
        let draft = input.into_draft().map_err(ServiceError::Validation)?;
        let blog = Blog::from_draft(draft, caller.user_id.clone());

        match self.blogs.insert_blog(&blog).await {
            Ok(()) => {}
            // A concurrent create with the same title won the race
            Err(crate::store::StoreError::Conflict(_)) => {
                return Err(ServiceError::invalid("A blog with this title already exists"))
            }
            Err(e) => return Err(e.into()),
        }
        info!("Instructor {} created blog {}", caller.user_id, blog.id);
        Ok(blog)
    }

    pub async fn update_blog(&self, caller: &AuthUser, id: &str, input: BlogInput) -> ServiceResult<Blog> {
        let mut blog = self.owned_blog(caller, id).await?;
        self.check_input(caller, &input, Some(&blog)).await?;
        let patch = input.into_patch().map_err(ServiceError::Validation)?;
        blog.apply(patch);

        match self.blogs.replace_blog(&blog).await {
            Ok(true) => {}
            Ok(false) => return Err(ServiceError::not_found(NOT_FOUND)),
            Err(crate::store::StoreError::Conflict(_)) => {
                return Err(ServiceError::invalid("A blog with this title already exists"))
            }
            Err(e) => return Err(e.into()),
        }
        info!("Instructor {} updated blog {}", caller.user_id, blog.id);
        Ok(blog)
    }

    pub async fn delete_blog(&self, caller: &AuthUser, id: &str) -> ServiceResult<()> {
        let blog = self.owned_blog(caller, id).await?;
        if !self.blogs.delete_blog(blog.id).await? {
            return Err(ServiceError::not_found(NOT_FOUND));
        }
        info!("Instructor {} deleted blog {}", caller.user_id, blog.id);
        Ok(())
    }

    // Student operations

    pub async fn list_published(&self, params: &BlogListParams) -> ServiceResult<Page<BlogSummary>> {
        let request = self.page_request(params)?;
        let mut query = BlogQuery::published();
        match criterion(params.category.as_deref(), BlogCategory::parse) {
            Criterion::Any => {}
            Criterion::Only(c) => query.category = Some(c),
            Criterion::Unmatchable => return Ok(empty_page(request)),
        }
        query.search = params.search.as_deref().and_then(TextSearch::new);
        Ok(self.page(query, request).await?.map(Blog::summarize))
    }

    /// Returns a published blog after counting the view.
    pub async fn view_published(&self, id: &str) -> ServiceResult<Blog> {
        let id = Uuid::parse_str(id).map_err(|_| ServiceError::not_found(NOT_PUBLISHED))?;
        self.blogs
            .record_view(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(NOT_PUBLISHED))
    }

    pub async fn list_by_category(
        &self,
        category: &str,
        params: &BlogListParams,
    ) -> ServiceResult<Page<BlogSummary>> {
        let request = self.page_request(params)?;
        let Some(category) = BlogCategory::parse(category) else {
            debug!("Unknown blog category requested: {}", category);
            return Ok(empty_page(request));
        };
        let query = BlogQuery { category: Some(category), ..BlogQuery::published() };
        Ok(self.page(query, request).await?.map(Blog::summarize))
    }

    pub async fn list_by_tag(&self, tag: &str, params: &BlogListParams) -> ServiceResult<Page<BlogSummary>> {
        let request = self.page_request(params)?;
        let query = BlogQuery { tag: Some(tag.to_string()), ..BlogQuery::published() };
        Ok(self.page(query, request).await?.map(Blog::summarize))
    }

    pub async fn popular(&self, limit: Option<&str>) -> ServiceResult<Vec<BlogSummary>> {
        let limit = self.featured_limit(limit)?;
        let query = BlogQuery { sort: BlogSort::MostViewed, ..BlogQuery::published() };
        let blogs = self.blogs.top_blogs(&query, limit).await?;
        Ok(blogs.into_iter().map(Blog::summarize).collect())
    }

    pub async fn recent(&self, limit: Option<&str>) -> ServiceResult<Vec<BlogSummary>> {
        let limit = self.featured_limit(limit)?;
        let blogs = self.blogs.top_blogs(&BlogQuery::published(), limit).await?;
        Ok(blogs.into_iter().map(Blog::summarize).collect())
    }

    pub async fn search(&self, params: &BlogListParams) -> ServiceResult<Page<BlogSummary>> {
        let search = params
            .q
            .as_deref()
            .and_then(TextSearch::new)
            .ok_or_else(|| ServiceError::invalid("Search query is required"))?;
        let request = self.page_request(params)?;
        let query = BlogQuery { search: Some(search), ..BlogQuery::published() };
        Ok(self.page(query, request).await?.map(Blog::summarize))
    }

    pub async fn like(&self, caller: &AuthUser, id: &str) -> ServiceResult<Blog> {
        self.adjust_likes(caller, id, 1).await
    }

    pub async fn unlike(&self, caller: &AuthUser, id: &str) -> ServiceResult<Blog> {
        self.adjust_likes(caller, id, -1).await
    }

    async fn adjust_likes(&self, caller: &AuthUser, id: &str, delta: i64) -> ServiceResult<Blog> {
        let id = Uuid::parse_str(id).map_err(|_| ServiceError::not_found(NOT_PUBLISHED))?;
        let blog = self
            .blogs
            .adjust_likes(id, delta)
            .await?
            .ok_or_else(|| ServiceError::not_found(NOT_PUBLISHED))?;
        debug!("User {} changed likes of blog {} by {}", caller.user_id, id, delta);
        Ok(blog)
    }
}

fn empty_page<T>(request: PageRequest) -> Page<T> {
    Page { items: Vec::new(), pagination: Pagination::new(request, 0) }
}
