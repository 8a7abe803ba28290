use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{Blog, BlogCategory, BlogStatus};
use crate::store::StoreError;

#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
    pub status: String,
    pub instructor_id: String,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BlogRow> for Blog {
    type Error = StoreError;

    fn try_from(row: BlogRow) -> Result<Self, Self::Error> {
        let category = BlogCategory::parse(&row.category)
            .ok_or_else(|| StoreError::Corrupt(format!("blog {} has category '{}'", row.id, row.category)))?;
        let status = BlogStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Corrupt(format!("blog {} has status '{}'", row.id, row.status)))?;
        Ok(Blog {
            id: row.id,
            title: row.title,
            summary: row.summary,
            content: row.content,
            category,
            author: row.author,
            image: row.image,
            tags: row.tags,
            status,
            instructor_id: row.instructor_id,
            view_count: row.view_count,
            like_count: row.like_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, status: &str) -> BlogRow {
        BlogRow {
            id: Uuid::new_v4(),
            title: "t".into(),
            summary: String::new(),
            content: "c".into(),
            category: category.into(),
            author: "a".into(),
            image: String::new(),
            tags: vec![],
            status: status.into(),
            instructor_id: "i1".into(),
            view_count: 3,
            like_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn converts_stored_enum_labels() {
        let blog = Blog::try_from(row("Công nghệ", "published")).unwrap();
        assert_eq!(blog.category, BlogCategory::Technology);
        assert!(blog.is_published());
        assert_eq!(blog.view_count, 3);
    }

    #[test]
    fn unknown_labels_are_corrupt() {
        assert!(matches!(Blog::try_from(row("Sports", "draft")), Err(StoreError::Corrupt(_))));
        assert!(matches!(Blog::try_from(row("Khác", "archived")), Err(StoreError::Corrupt(_))));
    }
}
