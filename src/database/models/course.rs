use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{types::Json, FromRow};

use crate::models::{Course, CourseStudent, Lecture};

#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    pub category: String,
    pub level: String,
    pub primary_language: String,
    pub subtitle: String,
    pub description: String,
    pub image: String,
    pub welcome_message: String,
    pub pricing: Decimal,
    pub objectives: String,
    pub curriculum: Json<Vec<Lecture>>,
    pub is_published: bool,
}

impl CourseRow {
    /// Joins the row with its student set, already in enrollment order.
    pub fn into_course(self, students: Vec<CourseStudent>) -> Course {
        Course {
            id: self.id,
            instructor_id: self.instructor_id,
            instructor_name: self.instructor_name,
            date: self.date,
            title: self.title,
            category: self.category,
            level: self.level,
            primary_language: self.primary_language,
            subtitle: self.subtitle,
            description: self.description,
            image: self.image,
            welcome_message: self.welcome_message,
            pricing: self.pricing,
            objectives: self.objectives,
            students,
            curriculum: self.curriculum.0,
            is_published: self.is_published,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseStudentRow {
    pub course_id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub paid_amount: Decimal,
}

impl From<CourseStudentRow> for CourseStudent {
    fn from(row: CourseStudentRow) -> Self {
        CourseStudent {
            student_id: row.student_id,
            student_name: row.student_name,
            student_email: row.student_email,
            paid_amount: row.paid_amount,
        }
    }
}
