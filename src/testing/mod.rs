use std::sync::Arc;

use rust_decimal::Decimal;

use crate::auth::AuthUser;
use crate::models::{Blog, BlogCategory, BlogDraft, BlogStatus, Course, CourseStudent};
use crate::store::{MemoryStore, Stores};

/// Fixture builders shared by the unit tests

pub fn paid_course(id: &str, title: &str, pricing: i64) -> Course {
    Course {
        id: id.to_string(),
        instructor_id: "instructor-1".to_string(),
        instructor_name: "Ada Lovelace".to_string(),
        date: None,
        title: title.to_string(),
        category: "web-development".to_string(),
        level: "beginner".to_string(),
        primary_language: "english".to_string(),
        subtitle: String::new(),
        description: String::new(),
        image: format!("https://cdn.example.com/{}.png", id),
        welcome_message: String::new(),
        pricing: Decimal::from(pricing),
        objectives: String::new(),
        students: Vec::new(),
        curriculum: Vec::new(),
        is_published: true,
    }
}

pub fn free_course(id: &str, title: &str) -> Course {
    paid_course(id, title, 0)
}

pub fn student_of(id: &str) -> CourseStudent {
    CourseStudent {
        student_id: id.to_string(),
        student_name: format!("Student {}", id),
        student_email: format!("{}@example.com", id),
        paid_amount: Decimal::ZERO,
    }
}

pub fn identity(id: &str) -> AuthUser {
    AuthUser {
        user_id: id.to_string(),
        user_name: format!("User {}", id),
        user_email: format!("{}@example.com", id),
        role: "user".to_string(),
    }
}

pub fn blog(instructor_id: &str, title: &str, status: BlogStatus) -> Blog {
    Blog::from_draft(
        BlogDraft {
            title: title.to_string(),
            summary: format!("About {}", title),
            content: format!("<p>{}</p>", title),
            category: BlogCategory::Technology,
            author: "Ada".to_string(),
            image: String::new(),
            tags: vec!["rust".to_string()],
            status,
        },
        instructor_id,
    )
}

/// Memory-backed store handles seeded with `courses`
pub fn memory_stores(courses: Vec<Course>) -> (Arc<MemoryStore>, Stores) {
    let store = Arc::new(MemoryStore::with_courses(courses));
    (store.clone(), Stores::shared(store))
}
