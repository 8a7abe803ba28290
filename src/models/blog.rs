use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 200;
pub const SUMMARY_MAX_CHARS: usize = 500;
pub const TAG_MAX_CHARS: usize = 50;

static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("script tag pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlogCategory {
    #[serde(rename = "Học tập")]
    Study,
    #[serde(rename = "Kỹ năng")]
    Skills,
    #[serde(rename = "Phát triển")]
    Development,
    #[serde(rename = "Công nghệ")]
    Technology,
    #[serde(rename = "Ngôn ngữ")]
    Language,
    #[serde(rename = "Giáo dục")]
    Education,
    #[serde(rename = "Khác")]
    #[default]
    Other,
}

impl BlogCategory {
    pub const ALL: [BlogCategory; 7] = [
        BlogCategory::Study,
        BlogCategory::Skills,
        BlogCategory::Development,
        BlogCategory::Technology,
        BlogCategory::Language,
        BlogCategory::Education,
        BlogCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlogCategory::Study => "Học tập",
            BlogCategory::Skills => "Kỹ năng",
            BlogCategory::Development => "Phát triển",
            BlogCategory::Technology => "Công nghệ",
            BlogCategory::Language => "Ngôn ngữ",
            BlogCategory::Education => "Giáo dục",
            BlogCategory::Other => "Khác",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Published,
    #[default]
    Draft,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Published => "published",
            BlogStatus::Draft => "draft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "published" => Some(BlogStatus::Published),
            "draft" => Some(BlogStatus::Draft),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: BlogCategory,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
    pub status: BlogStatus,
    pub instructor_id: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn from_draft(draft: BlogDraft, instructor_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            summary: draft.summary,
            content: draft.content,
            category: draft.category,
            author: draft.author,
            image: draft.image,
            tags: draft.tags,
            status: draft.status,
            instructor_id: instructor_id.into(),
            view_count: 0,
            like_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published
    }

    /// Applies an already validated patch; absent fields are left untouched.
    pub fn apply(&mut self, patch: BlogPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.summary {
            self.summary = v;
        }
        if let Some(v) = patch.content {
            self.content = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.author {
            self.author = v;
        }
        if let Some(v) = patch.image {
            self.image = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.updated_at = Utc::now();
    }

    pub fn summarize(self) -> BlogSummary {
        BlogSummary {
            id: self.id,
            title: self.title,
            summary: self.summary,
            category: self.category,
            author: self.author,
            image: self.image,
            tags: self.tags,
            status: self.status,
            instructor_id: self.instructor_id,
            view_count: self.view_count,
            like_count: self.like_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// List-view projection of a blog: everything but `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub category: BlogCategory,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
    pub status: BlogStatus,
    pub instructor_id: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create/update body. Every field is optional at this layer so that
/// validation can report all problems at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
}

/// Validated fields for a new blog.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogDraft {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: BlogCategory,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
    pub status: BlogStatus,
}

/// Validated fields for a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<BlogCategory>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<BlogStatus>,
}

impl BlogInput {
    /// Trimmed title, if one was supplied.
    pub fn normalized_title(&self) -> Option<String> {
        self.title.as_deref().map(|t| t.trim().to_string())
    }

    pub fn into_draft(self) -> Result<BlogDraft, Vec<String>> {
        let mut errors = Vec::new();

        let title = self.title.as_deref().map(str::trim).unwrap_or_default().to_string();
        if title.is_empty() {
            errors.push("Title is required".to_string());
        }
        let content = self.content.as_deref().map(sanitize_content).unwrap_or_default();
        if content.trim().is_empty() {
            errors.push("Content is required".to_string());
        }
        let author = self.author.as_deref().map(str::trim).unwrap_or_default().to_string();
        if author.is_empty() {
            errors.push("Author is required".to_string());
        }

        let patch = BlogInput {
            title: Some(title.clone()).filter(|t| !t.is_empty()),
            summary: self.summary,
            content: None,
            category: self.category,
            author: None,
            image: self.image,
            tags: self.tags,
            status: self.status,
        }
        .into_patch_collecting(&mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BlogDraft {
            title,
            summary: patch.summary.unwrap_or_default(),
            content,
            category: patch.category.unwrap_or_default(),
            author,
            image: patch.image.unwrap_or_default(),
            tags: patch.tags.unwrap_or_default(),
            status: patch.status.unwrap_or_default(),
        })
    }

    pub fn into_patch(self) -> Result<BlogPatch, Vec<String>> {
        let mut errors = Vec::new();
        let patch = self.into_patch_collecting(&mut errors);
        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }

    fn into_patch_collecting(self, errors: &mut Vec<String>) -> BlogPatch {
        let title = self.title.map(|t| t.trim().to_string());
        if let Some(t) = &title {
            if t.is_empty() {
                errors.push("Title is required".to_string());
            } else if t.chars().count() > TITLE_MAX_CHARS {
                errors.push(format!("Title cannot exceed {} characters", TITLE_MAX_CHARS));
            }
        }

        let summary = self.summary.map(|s| s.trim().to_string());
        if let Some(s) = &summary {
            if s.chars().count() > SUMMARY_MAX_CHARS {
                errors.push(format!("Summary cannot exceed {} characters", SUMMARY_MAX_CHARS));
            }
        }

        let content = self.content.map(|c| sanitize_content(&c));
        if matches!(&content, Some(c) if c.trim().is_empty()) {
            errors.push("Content is required".to_string());
        }

        let author = self.author.map(|a| a.trim().to_string());
        if matches!(&author, Some(a) if a.is_empty()) {
            errors.push("Author is required".to_string());
        }

        let category = self.category.and_then(|c| match BlogCategory::parse(&c) {
            Some(category) => Some(category),
            None => {
                errors.push(format!("`{}` is not a valid category", c));
                None
            }
        });

        let status = self.status.and_then(|s| match BlogStatus::parse(&s) {
            Some(status) => Some(status),
            None => {
                errors.push(format!("`{}` is not a valid status", s));
                None
            }
        });

        if let Some(tags) = &self.tags {
            if tags.iter().any(|t| t.chars().count() > TAG_MAX_CHARS) {
                errors.push(format!("Each tag cannot exceed {} characters", TAG_MAX_CHARS));
            }
        }

        BlogPatch {
            title,
            summary,
            content,
            category,
            author,
            image: self.image,
            tags: self.tags,
            status,
        }
    }
}

/// Removes `<script>` blocks from user-supplied HTML content.
pub fn sanitize_content(content: &str) -> String {
    SCRIPT_TAG.replace_all(content, "").into_owned()
}

/// Only absolute http(s) URLs are accepted as blog images.
pub fn is_valid_image_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSort {
    /// `createdAt` descending
    #[default]
    Newest,
    /// `viewCount` descending, then `createdAt` descending
    MostViewed,
}

/// Case-insensitive substring search over title, summary, content and tags.
/// The needle is matched literally, never interpreted as a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    needle: String,
}

impl TextSearch {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self { needle: trimmed.to_lowercase() })
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// `ILIKE` pattern with `%`, `_` and `\` escaped.
    pub fn ilike_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.needle.len() + 2);
        escaped.push('%');
        for ch in self.needle.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped.push('%');
        escaped
    }

    pub fn matches(&self, blog: &Blog) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(&self.needle);
        hit(&blog.title)
            || hit(&blog.summary)
            || hit(&blog.content)
            || blog.tags.iter().any(|t| hit(t))
    }
}

/// Filter for blog listings. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogQuery {
    pub instructor_id: Option<String>,
    pub status: Option<BlogStatus>,
    pub category: Option<BlogCategory>,
    pub tag: Option<String>,
    pub search: Option<TextSearch>,
    pub sort: BlogSort,
}

impl BlogQuery {
    pub fn published() -> Self {
        Self { status: Some(BlogStatus::Published), ..Default::default() }
    }

    pub fn matches(&self, blog: &Blog) -> bool {
        if let Some(id) = &self.instructor_id {
            if &blog.instructor_id != id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if blog.status != status {
                return false;
            }
        }
        if let Some(category) = self.category {
            if blog.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !blog.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !search.matches(blog) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BlogInput {
        BlogInput {
            title: Some("  Learning Rust  ".into()),
            content: Some("<p>hello</p>".into()),
            author: Some("Ada".into()),
            ..Default::default()
        }
    }

    #[test]
    fn draft_applies_defaults_and_trims() {
        let draft = input().into_draft().unwrap();
        assert_eq!(draft.title, "Learning Rust");
        assert_eq!(draft.category, BlogCategory::Other);
        assert_eq!(draft.status, BlogStatus::Draft);
        assert!(draft.tags.is_empty());
        assert_eq!(draft.image, "");
    }

    #[test]
    fn draft_reports_every_missing_field() {
        let errors = BlogInput::default().into_draft().unwrap_err();
        assert!(errors.contains(&"Title is required".to_string()));
        assert!(errors.contains(&"Content is required".to_string()));
        assert!(errors.contains(&"Author is required".to_string()));
    }

    #[test]
    fn draft_rejects_overlong_fields_and_bad_enums() {
        let mut raw = input();
        raw.title = Some("x".repeat(201));
        raw.summary = Some("y".repeat(501));
        raw.category = Some("Cooking".into());
        raw.status = Some("archived".into());
        raw.tags = Some(vec!["z".repeat(51)]);
        let errors = raw.into_draft().unwrap_err();
        assert_eq!(errors.len(), 5, "{:?}", errors);
    }

    #[test]
    fn script_blocks_are_stripped() {
        let cleaned = sanitize_content("a<SCRIPT type=\"x\">alert(1)</script>b<script>\nx\n</script >c");
        assert_eq!(cleaned, "abc");
    }

    #[test]
    fn image_url_requires_http_scheme() {
        assert!(is_valid_image_url("https://cdn.example.com/a.png"));
        assert!(is_valid_image_url("http://example.com/a.png"));
        assert!(!is_valid_image_url("ftp://example.com/a.png"));
        assert!(!is_valid_image_url("javascript:alert(1)"));
        assert!(!is_valid_image_url("not a url"));
    }

    #[test]
    fn category_round_trips_through_wire_name() {
        assert_eq!(BlogCategory::parse("Công nghệ"), Some(BlogCategory::Technology));
        let v = serde_json::to_value(BlogCategory::Technology).unwrap();
        assert_eq!(v, "Công nghệ");
    }

    #[test]
    fn text_search_is_literal_and_case_insensitive() {
        let search = TextSearch::new("C++").unwrap();
        assert_eq!(search.ilike_pattern(), "%c++%");
        assert_eq!(TextSearch::new("50%_off").unwrap().ilike_pattern(), "%50\\%\\_off%");
        assert!(TextSearch::new("   ").is_none());

        let mut blog = Blog::from_draft(input().into_draft().unwrap(), "i1");
        blog.tags = vec!["Modern C++".into()];
        assert!(search.matches(&blog));
        assert!(TextSearch::new("RUST").unwrap().matches(&blog));
        assert!(!TextSearch::new("python").unwrap().matches(&blog));
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let mut blog = Blog::from_draft(input().into_draft().unwrap(), "i1");
        let patch = BlogInput { status: Some("published".into()), ..Default::default() }
            .into_patch()
            .unwrap();
        blog.apply(patch);
        assert_eq!(blog.title, "Learning Rust");
        assert!(blog.is_published());
    }

    #[test]
    fn patch_overwrites_each_supplied_field() {
        let mut blog = Blog::from_draft(input().into_draft().unwrap(), "i1");
        let patch = BlogInput {
            summary: Some(" short ".into()),
            author: Some("Grace".into()),
            tags: Some(vec!["rust".into()]),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        blog.apply(patch);
        assert_eq!(blog.title, "Learning Rust");
        assert_eq!(blog.summary, "short");
        assert_eq!(blog.author, "Grace");
        assert_eq!(blog.tags, vec!["rust".to_string()]);
    }

    #[test]
    fn invalid_patch_collects_errors() {
        let errors = BlogInput { title: Some("   ".into()), author: Some("".into()), ..Default::default() }
            .into_patch()
            .unwrap_err();
        assert_eq!(errors, vec!["Title is required".to_string(), "Author is required".to_string()]);
    }

    #[test]
    fn summary_omits_content() {
        let blog = Blog::from_draft(input().into_draft().unwrap(), "i1");
        let v = serde_json::to_value(blog.summarize()).unwrap();
        assert!(v.get("content").is_none());
        assert!(v.get("viewCount").is_some());
    }
}
