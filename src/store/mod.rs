//! Persistence seams. Handlers and services only see these traits; the
//! PostgreSQL backend lives in `crate::database`, the in-memory backend in
//! [`memory`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::models::{
    Blog, BlogQuery, Course, CourseQuery, CourseStudent, EnrolledCourse, EnrollOutcome,
    EnrollmentRecord, Page, PageRequest,
};

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, StoreError>;

    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError>;

    /// Connectivity probe for `/health`
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn find_enrollment(&self, user_id: &str) -> Result<Option<EnrollmentRecord>, StoreError>;

    /// Atomically appends `entry` to the student's record (creating the record
    /// if needed) unless an entry for the same course already exists, and adds
    /// `student` to the course's student set. The set update is idempotent.
    /// Nothing is written when the outcome is `AlreadyEnrolled`.
    async fn enroll(
        &self,
        user_id: &str,
        entry: EnrolledCourse,
        student: CourseStudent,
    ) -> Result<EnrollOutcome, StoreError>;
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_blogs(&self, query: &BlogQuery, page: PageRequest) -> Result<Page<Blog>, StoreError>;

    /// First `limit` matches in query order, without counting
    async fn top_blogs(&self, query: &BlogQuery, limit: u32) -> Result<Vec<Blog>, StoreError>;

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;

    async fn title_taken(
        &self,
        instructor_id: &str,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError>;

    /// Fails with `StoreError::Conflict` if the instructor already owns a blog
    /// with the same title.
    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError>;

    /// Returns false when no blog with that id exists.
    async fn replace_blog(&self, blog: &Blog) -> Result<bool, StoreError>;

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Increments the view counter of a published blog and returns it.
    async fn record_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;

    /// Adds `delta` to the like counter of a published blog, clamped at zero.
    async fn adjust_likes(&self, id: Uuid, delta: i64) -> Result<Option<Blog>, StoreError>;
}

/// The three store handles the services need, usually backed by one object.
#[derive(Clone)]
pub struct Stores {
    pub courses: Arc<dyn CourseStore>,
    pub enrollments: Arc<dyn EnrollmentStore>,
    pub blogs: Arc<dyn BlogStore>,
}

impl Stores {
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: CourseStore + EnrollmentStore + BlogStore + 'static,
    {
        Self {
            courses: store.clone(),
            enrollments: store.clone(),
            blogs: store,
        }
    }
}
