use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-student aggregate of enrolled courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub user_id: String,
    pub courses: Vec<EnrolledCourse>,
}

impl EnrollmentRecord {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), courses: Vec::new() }
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.course_id == course_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub course_id: String,
    pub title: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub date_of_purchase: DateTime<Utc>,
    pub course_image: String,
}

/// Outcome of the store-level conditional enrollment write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Enrolled,
    AlreadyEnrolled,
}
