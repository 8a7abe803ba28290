use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A course as exposed to students. Courses are authored by instructor
/// workflows outside this service; enrollment only mutates `students`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub primary_language: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub welcome_message: String,
    pub pricing: Decimal,
    #[serde(default)]
    pub objectives: String,
    #[serde(default)]
    pub students: Vec<CourseStudent>,
    #[serde(default)]
    pub curriculum: Vec<Lecture>,
    // Wire name kept as the frontend expects it
    #[serde(rename = "isPublised", default)]
    pub is_published: bool,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.pricing.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStudent {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub paid_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub title: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(rename = "public_id", default)]
    pub public_id: String,
    #[serde(default)]
    pub free_preview: bool,
}

/// Sort keys accepted by the course list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CourseSort {
    #[default]
    PriceLowToHigh,
    PriceHighToLow,
    TitleAToZ,
    TitleZToA,
}

impl CourseSort {
    /// Unknown keys fall back to the default ordering.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("price-hightolow") => CourseSort::PriceHighToLow,
            Some("title-atoz") => CourseSort::TitleAToZ,
            Some("title-ztoa") => CourseSort::TitleZToA,
            _ => CourseSort::PriceLowToHigh,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseQuery {
    pub categories: Vec<String>,
    pub levels: Vec<String>,
    pub primary_languages: Vec<String>,
    pub sort: CourseSort,
}

impl CourseQuery {
    pub fn matches(&self, course: &Course) -> bool {
        fn allowed(list: &[String], value: &str) -> bool {
            list.is_empty() || list.iter().any(|v| v == value)
        }
        allowed(&self.categories, &course.category)
            && allowed(&self.levels, &course.level)
            && allowed(&self.primary_languages, &course.primary_language)
    }
}

/// Splits a comma-separated query value, dropping empty segments.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_key_defaults_to_price_ascending() {
        assert_eq!(CourseSort::parse(None), CourseSort::PriceLowToHigh);
        assert_eq!(CourseSort::parse(Some("newest")), CourseSort::PriceLowToHigh);
        assert_eq!(CourseSort::parse(Some("title-ztoa")), CourseSort::TitleZToA);
    }

    #[test]
    fn split_list_ignores_blank_segments() {
        assert_eq!(split_list(Some("a, b,,c")), vec!["a", "b", "c"]);
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn course_serializes_with_wire_names() {
        let course = Course {
            id: "c1".into(),
            instructor_id: "i1".into(),
            instructor_name: "Ada".into(),
            date: None,
            title: "Intro".into(),
            category: "web".into(),
            level: "beginner".into(),
            primary_language: "english".into(),
            subtitle: String::new(),
            description: String::new(),
            image: String::new(),
            welcome_message: String::new(),
            pricing: Decimal::ZERO,
            objectives: String::new(),
            students: vec![],
            curriculum: vec![],
            is_published: true,
        };
        let v = serde_json::to_value(&course).unwrap();
        assert_eq!(v["_id"], "c1");
        assert_eq!(v["primaryLanguage"], "english");
        assert_eq!(v["isPublised"], true);
        assert_eq!(v["pricing"], 0.0);
        assert!(course.is_free());
    }
}
