pub mod blog;
pub mod course;
pub mod enrollment;
pub mod page;

pub use blog::{
    Blog, BlogCategory, BlogDraft, BlogInput, BlogPatch, BlogQuery, BlogSort, BlogStatus,
    BlogSummary, TextSearch,
};
pub use course::{Course, CourseQuery, CourseSort, CourseStudent, Lecture};
pub use enrollment::{EnrolledCourse, EnrollOutcome, EnrollmentRecord};
pub use page::{Page, PageRequest, Pagination};
