use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogStore, CourseStore, EnrollmentStore, StoreError};
use crate::models::{
    Blog, BlogQuery, BlogSort, Course, CourseQuery, CourseSort, CourseStudent, EnrolledCourse,
    EnrollOutcome, EnrollmentRecord, Page, PageRequest, Pagination,
};

#[derive(Default)]
struct State {
    courses: Vec<Course>,
    enrollments: HashMap<String, EnrollmentRecord>,
    blogs: HashMap<Uuid, Blog>,
}

/// In-process store. Every mutation runs under a single write lock, so
/// multi-record updates are atomic with respect to other requests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: Vec<Course>) -> Self {
        Self {
            state: RwLock::new(State { courses, ..Default::default() }),
        }
    }
}

fn compare_courses(sort: CourseSort, a: &Course, b: &Course) -> Ordering {
    match sort {
        CourseSort::PriceLowToHigh => a.pricing.cmp(&b.pricing),
        CourseSort::PriceHighToLow => b.pricing.cmp(&a.pricing),
        CourseSort::TitleAToZ => a.title.cmp(&b.title),
        CourseSort::TitleZToA => b.title.cmp(&a.title),
    }
}

fn compare_blogs(sort: BlogSort, a: &Blog, b: &Blog) -> Ordering {
    let newest = b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id));
    match sort {
        BlogSort::Newest => newest,
        BlogSort::MostViewed => b.view_count.cmp(&a.view_count).then(newest),
    }
}

impl State {
    fn matching_blogs(&self, query: &BlogQuery) -> Vec<&Blog> {
        let mut blogs: Vec<&Blog> = self.blogs.values().filter(|b| query.matches(b)).collect();
        blogs.sort_by(|a, b| compare_blogs(query.sort, a, b));
        blogs
    }

    fn title_taken(&self, instructor_id: &str, title: &str, exclude: Option<Uuid>) -> bool {
        self.blogs.values().any(|b| {
            b.instructor_id == instructor_id && b.title == title && Some(b.id) != exclude
        })
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, StoreError> {
        let state = self.state.read().await;
        let mut courses: Vec<Course> =
            state.courses.iter().filter(|c| query.matches(c)).cloned().collect();
        courses.sort_by(|a, b| compare_courses(query.sort, a, b));
        Ok(courses)
    }

    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        let state = self.state.read().await;
        Ok(state.courses.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn find_enrollment(&self, user_id: &str) -> Result<Option<EnrollmentRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state.enrollments.get(user_id).cloned())
    }

    async fn enroll(
        &self,
        user_id: &str,
        entry: EnrolledCourse,
        student: CourseStudent,
    ) -> Result<EnrollOutcome, StoreError> {
        let mut state = self.state.write().await;

        if state.enrollments.get(user_id).is_some_and(|r| r.contains(&entry.course_id)) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let course_id = entry.course_id.clone();
        state
            .enrollments
            .entry(user_id.to_string())
            .or_insert_with(|| EnrollmentRecord::new(user_id))
            .courses
            .push(entry);

        if let Some(course) = state.courses.iter_mut().find(|c| c.id == course_id) {
            if !course.students.iter().any(|s| s.student_id == student.student_id) {
                course.students.push(student);
            }
        }

        Ok(EnrollOutcome::Enrolled)
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self, query: &BlogQuery, page: PageRequest) -> Result<Page<Blog>, StoreError> {
        let state = self.state.read().await;
        let matching = state.matching_blogs(query);
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok(Page { items, pagination: Pagination::new(page, total) })
    }

    async fn top_blogs(&self, query: &BlogQuery, limit: u32) -> Result<Vec<Blog>, StoreError> {
        let state = self.state.read().await;
        Ok(state.matching_blogs(query).into_iter().take(limit as usize).cloned().collect())
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        Ok(self.state.read().await.blogs.get(&id).cloned())
    }

    async fn title_taken(
        &self,
        instructor_id: &str,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        Ok(self.state.read().await.title_taken(instructor_id, title, exclude))
    }

    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if state.title_taken(&blog.instructor_id, &blog.title, None) {
            return Err(StoreError::Conflict(format!("duplicate blog title '{}'", blog.title)));
        }
        state.blogs.insert(blog.id, blog.clone());
        Ok(())
    }

    async fn replace_blog(&self, blog: &Blog) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if !state.blogs.contains_key(&blog.id) {
            return Ok(false);
        }
        if state.title_taken(&blog.instructor_id, &blog.title, Some(blog.id)) {
            return Err(StoreError::Conflict(format!("duplicate blog title '{}'", blog.title)));
        }
        state.blogs.insert(blog.id, blog.clone());
        Ok(true)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.write().await.blogs.remove(&id).is_some())
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.blogs.get_mut(&id).filter(|b| b.is_published()).map(|blog| {
            blog.view_count += 1;
            blog.clone()
        }))
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> Result<Option<Blog>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.blogs.get_mut(&id).filter(|b| b.is_published()).map(|blog| {
            blog.like_count = (blog.like_count + delta).max(0);
            blog.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{blog, free_course, paid_course, student_of};
    use crate::models::BlogStatus;
    use chrono::{Duration, Utc};

    fn entry(course_id: &str) -> EnrolledCourse {
        EnrolledCourse {
            course_id: course_id.into(),
            title: "Intro".into(),
            instructor_id: "i1".into(),
            instructor_name: "Ada".into(),
            date_of_purchase: Utc::now(),
            course_image: String::new(),
        }
    }

    #[tokio::test]
    async fn enroll_creates_record_lazily_then_appends() {
        let store = MemoryStore::with_courses(vec![free_course("c1", "Intro"), free_course("c2", "Next")]);
        assert!(store.find_enrollment("s1").await.unwrap().is_none());

        let out = store.enroll("s1", entry("c1"), student_of("s1")).await.unwrap();
        assert_eq!(out, EnrollOutcome::Enrolled);
        store.enroll("s1", entry("c2"), student_of("s1")).await.unwrap();

        let record = store.find_enrollment("s1").await.unwrap().unwrap();
        let ids: Vec<_> = record.courses.iter().map(|c| c.course_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn duplicate_enroll_writes_nothing() {
        let store = MemoryStore::with_courses(vec![free_course("c1", "Intro")]);
        store.enroll("s1", entry("c1"), student_of("s1")).await.unwrap();
        let out = store.enroll("s1", entry("c1"), student_of("s1")).await.unwrap();
        assert_eq!(out, EnrollOutcome::AlreadyEnrolled);

        let record = store.find_enrollment("s1").await.unwrap().unwrap();
        assert_eq!(record.courses.len(), 1);
        let course = store.find_course("c1").await.unwrap().unwrap();
        assert_eq!(course.students.len(), 1);
    }

    #[tokio::test]
    async fn student_set_add_is_idempotent() {
        let mut course = free_course("c1", "Intro");
        course.students.push(student_of("s1"));
        let store = MemoryStore::with_courses(vec![course]);

        store.enroll("s1", entry("c1"), student_of("s1")).await.unwrap();
        let course = store.find_course("c1").await.unwrap().unwrap();
        assert_eq!(course.students.len(), 1);
    }

    #[tokio::test]
    async fn courses_filter_and_sort() {
        let mut a = paid_course("a", "Zeta", 30);
        a.level = "advanced".into();
        let b = paid_course("b", "Alpha", 10);
        let c = free_course("c", "Mid");
        let store = MemoryStore::with_courses(vec![a, b, c]);

        let by_price = store.list_courses(&CourseQuery::default()).await.unwrap();
        let ids: Vec<_> = by_price.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);

        let query = CourseQuery { sort: CourseSort::TitleZToA, ..Default::default() };
        let ids: Vec<_> = store.list_courses(&query).await.unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);

        let query = CourseQuery { levels: vec!["advanced".into()], ..Default::default() };
        assert_eq!(store.list_courses(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blog_pages_are_newest_first() {
        let store = MemoryStore::new();
        let base = Utc::now();
        for i in 0..5 {
            let mut b = blog("i1", &format!("Post {}", i), BlogStatus::Published);
            b.created_at = base + Duration::seconds(i);
            store.insert_blog(&b).await.unwrap();
        }
        let page = store
            .list_blogs(&BlogQuery::published(), PageRequest { page: 2, limit: 2 })
            .await
            .unwrap();
        let titles: Vec<_> = page.items.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Post 2", "Post 1"]);
        assert_eq!(page.pagination.total_items, 5);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn duplicate_title_is_a_conflict_per_instructor() {
        let store = MemoryStore::new();
        store.insert_blog(&blog("i1", "Same", BlogStatus::Draft)).await.unwrap();
        store.insert_blog(&blog("i2", "Same", BlogStatus::Draft)).await.unwrap();
        let err = store.insert_blog(&blog("i1", "Same", BlogStatus::Draft)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn views_and_likes_only_touch_published_blogs() {
        let store = MemoryStore::new();
        let published = blog("i1", "Live", BlogStatus::Published);
        let draft = blog("i1", "Hidden", BlogStatus::Draft);
        store.insert_blog(&published).await.unwrap();
        store.insert_blog(&draft).await.unwrap();

        assert_eq!(store.record_view(published.id).await.unwrap().unwrap().view_count, 1);
        assert!(store.record_view(draft.id).await.unwrap().is_none());

        assert_eq!(store.adjust_likes(published.id, -1).await.unwrap().unwrap().like_count, 0);
        assert_eq!(store.adjust_likes(published.id, 1).await.unwrap().unwrap().like_count, 1);
    }
}
