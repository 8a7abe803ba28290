use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::auth::AuthUser;
use crate::models::{CourseStudent, EnrolledCourse, EnrollOutcome};
use crate::store::{CourseStore, EnrollmentStore};

/// Body of `POST /courses/enroll-free`. Only `courseId` is required;
/// the denormalized fields fall back to the caller's token and the course
/// record when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollFreeCourseRequest {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub instructor_id: Option<String>,
    pub instructor_name: Option<String>,
    pub course_image: Option<String>,
    pub course_title: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentReceipt {
    pub course_id: String,
    pub course_title: String,
}

#[derive(Clone)]
pub struct EnrollmentService {
    courses: Arc<dyn CourseStore>,
    enrollments: Arc<dyn EnrollmentStore>,
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl EnrollmentService {
    pub fn new(courses: Arc<dyn CourseStore>, enrollments: Arc<dyn EnrollmentStore>) -> Self {
        Self { courses, enrollments }
    }

    /// Enrolls the caller in a free course. The record append and the
    /// course's student-set update happen in one conditional store write.
    pub async fn enroll_free(
        &self,
        caller: &AuthUser,
        request: EnrollFreeCourseRequest,
    ) -> ServiceResult<EnrollmentReceipt> {
        let course_id = present(request.course_id)
            .ok_or_else(|| ServiceError::invalid("Course ID is required"))?;

        if let Some(user_id) = present(request.user_id) {
            if user_id != caller.user_id {
                warn!("User {} attempted to enroll on behalf of {}", caller.user_id, user_id);
                return Err(ServiceError::invalid("Cannot enroll on behalf of another user"));
            }
        }

        let course = self
            .courses
            .find_course(&course_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course not found"))?;

        if !course.is_free() {
            return Err(ServiceError::invalid("This course is not free"));
        }

        let course_title = present(request.course_title).unwrap_or_else(|| course.title.clone());
        let entry = EnrolledCourse {
            course_id: course.id.clone(),
            title: course_title.clone(),
            instructor_id: present(request.instructor_id).unwrap_or_else(|| course.instructor_id.clone()),
            instructor_name: present(request.instructor_name)
                .unwrap_or_else(|| course.instructor_name.clone()),
            date_of_purchase: Utc::now(),
            course_image: present(request.course_image).unwrap_or_else(|| course.image.clone()),
        };
        let student = CourseStudent {
            student_id: caller.user_id.clone(),
            student_name: present(request.user_name).unwrap_or_else(|| caller.user_name.clone()),
            student_email: present(request.user_email).unwrap_or_else(|| caller.user_email.clone()),
            paid_amount: Decimal::ZERO,
        };

        match self.enrollments.enroll(&caller.user_id, entry, student).await? {
            EnrollOutcome::Enrolled => {
                info!("Enrolled user {} in free course {}", caller.user_id, course.id);
                Ok(EnrollmentReceipt { course_id: course.id, course_title })
            }
            EnrollOutcome::AlreadyEnrolled => {
                Err(ServiceError::Conflict("You are already enrolled in this course".to_string()))
            }
        }
    }

    /// True iff the student's record holds an entry for exactly `course_id`.
    pub async fn purchase_info(&self, course_id: &str, student_id: &str) -> ServiceResult<bool> {
        let record = self.enrollments.find_enrollment(student_id).await?;
        Ok(record.is_some_and(|r| r.contains(course_id)))
    }
}
