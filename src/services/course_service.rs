use std::sync::Arc;

use serde::Deserialize;

use super::{ServiceError, ServiceResult};
use crate::models::course::split_list;
use crate::models::{Course, CourseQuery, CourseSort};
use crate::store::CourseStore;

/// Query string of the student course list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListParams {
    pub category: Option<String>,
    pub level: Option<String>,
    pub primary_language: Option<String>,
    pub sort_by: Option<String>,
}

impl CourseListParams {
    pub fn to_query(&self) -> CourseQuery {
        CourseQuery {
            categories: split_list(self.category.as_deref()),
            levels: split_list(self.level.as_deref()),
            primary_languages: split_list(self.primary_language.as_deref()),
            sort: CourseSort::parse(self.sort_by.as_deref()),
        }
    }
}

#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseStore>,
}

impl CourseService {
    pub fn new(courses: Arc<dyn CourseStore>) -> Self {
        Self { courses }
    }

    pub async fn list(&self, params: &CourseListParams) -> ServiceResult<Vec<Course>> {
        Ok(self.courses.list_courses(&params.to_query()).await?)
    }

    pub async fn details(&self, id: &str) -> ServiceResult<Course> {
        self.courses
            .find_course(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("No course details found"))
    }
}
