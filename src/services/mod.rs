//! Business rules. Services take explicit caller identity and talk to the
//! store traits only; they know nothing about HTTP.

pub mod blog_service;
pub mod course_service;
pub mod enrollment_service;

use thiserror::Error;

use crate::store::StoreError;

pub use blog_service::{BlogLimits, BlogListParams, BlogService};
pub use course_service::{CourseListParams, CourseService};
pub use enrollment_service::{EnrollFreeCourseRequest, EnrollmentReceipt, EnrollmentService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    /// Field-level validation failures, reported together
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidRequest(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
