use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::EnrolledCourse;

/// One entry of a student's enrollment record. The record itself is the
/// ordered set of rows sharing a `user_id`.
#[derive(Debug, Clone, FromRow)]
pub struct EnrolledCourseRow {
    pub user_id: String,
    pub course_id: String,
    pub title: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub date_of_purchase: DateTime<Utc>,
    pub course_image: String,
}

impl From<EnrolledCourseRow> for EnrolledCourse {
    fn from(row: EnrolledCourseRow) -> Self {
        EnrolledCourse {
            course_id: row.course_id,
            title: row.title,
            instructor_id: row.instructor_id,
            instructor_name: row.instructor_name,
            date_of_purchase: row.date_of_purchase,
            course_image: row.course_image,
        }
    }
}
