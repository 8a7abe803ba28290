//! Row shapes as stored in PostgreSQL, converted into domain models at the
//! store boundary.

pub mod blog;
pub mod course;
pub mod enrollment;

pub use blog::BlogRow;
pub use course::{CourseRow, CourseStudentRow};
pub use enrollment::EnrolledCourseRow;
