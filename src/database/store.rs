use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use sqlx::{types::Json, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{BlogRow, CourseRow, CourseStudentRow, EnrolledCourseRow};
use crate::database::repository::Repository;
use crate::models::{
    Blog, BlogQuery, BlogSort, BlogStatus, Course, CourseQuery, CourseSort, CourseStudent,
    EnrolledCourse, EnrollOutcome, EnrollmentRecord, Page, PageRequest, Pagination,
};
use crate::store::{BlogStore, CourseStore, EnrollmentStore, StoreError};

/// PostgreSQL-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts a course and adds any of its students that are not yet in the
    /// student set. Used for seeding; enrollment goes through [`EnrollmentStore::enroll`].
    pub async fn put_course(&self, course: &Course) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"INSERT INTO courses (id, instructor_id, instructor_name, date, title, category, level,
                   primary_language, subtitle, description, image, welcome_message, pricing,
                   objectives, curriculum, is_published)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
               ON CONFLICT (id) DO UPDATE SET
                   instructor_id = EXCLUDED.instructor_id,
                   instructor_name = EXCLUDED.instructor_name,
                   date = EXCLUDED.date,
                   title = EXCLUDED.title,
                   category = EXCLUDED.category,
                   level = EXCLUDED.level,
                   primary_language = EXCLUDED.primary_language,
                   subtitle = EXCLUDED.subtitle,
                   description = EXCLUDED.description,
                   image = EXCLUDED.image,
                   welcome_message = EXCLUDED.welcome_message,
                   pricing = EXCLUDED.pricing,
                   objectives = EXCLUDED.objectives,
                   curriculum = EXCLUDED.curriculum,
                   is_published = EXCLUDED.is_published"#,
        )
        .bind(&course.id)
        .bind(&course.instructor_id)
        .bind(&course.instructor_name)
        .bind(course.date)
        .bind(&course.title)
        .bind(&course.category)
        .bind(&course.level)
        .bind(&course.primary_language)
        .bind(&course.subtitle)
        .bind(&course.description)
        .bind(&course.image)
        .bind(&course.welcome_message)
        .bind(course.pricing)
        .bind(&course.objectives)
        .bind(Json(&course.curriculum))
        .bind(course.is_published)
        .execute(&mut *tx)
        .await?;

        for student in &course.students {
            insert_course_student(&mut tx, &course.id, student).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn students_for(&self, course_ids: &[String]) -> Result<HashMap<String, Vec<CourseStudent>>, StoreError> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, CourseStudentRow>(
            "SELECT * FROM course_students WHERE course_id = ANY($1) ORDER BY position",
        )
        .bind(course_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_course: HashMap<String, Vec<CourseStudent>> = HashMap::new();
        for row in rows {
            by_course.entry(row.course_id.clone()).or_default().push(row.into());
        }
        Ok(by_course)
    }

    fn blogs(&self) -> Repository<BlogRow> {
        Repository::new("blogs", self.pool.clone())
    }
}

async fn insert_course_student(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    course_id: &str,
    student: &CourseStudent,
) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"INSERT INTO course_students (course_id, student_id, student_name, student_email, paid_amount)
           VALUES ($1, $2, $3, $4, $5)
           ON CONFLICT (course_id, student_id) DO NOTHING"#,
    )
    .bind(course_id)
    .bind(&student.student_id)
    .bind(&student.student_name)
    .bind(&student.student_email)
    .bind(student.paid_amount)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}

/// Where-document and ordering for a course catalogue query.
fn course_filter(query: &CourseQuery) -> (Value, &'static str) {
    let mut conditions = Map::new();
    for (column, values) in [
        ("category", &query.categories),
        ("level", &query.levels),
        ("primary_language", &query.primary_languages),
    ] {
        if !values.is_empty() {
            conditions.insert(column.to_string(), json!({ "$in": values }));
        }
    }
    let order = match query.sort {
        CourseSort::PriceLowToHigh => "pricing asc, id asc",
        CourseSort::PriceHighToLow => "pricing desc, id asc",
        CourseSort::TitleAToZ => "title asc, id asc",
        CourseSort::TitleZToA => "title desc, id asc",
    };
    (Value::Object(conditions), order)
}

fn blog_where(query: &BlogQuery) -> Value {
    let mut conditions = Map::new();
    if let Some(id) = &query.instructor_id {
        conditions.insert("instructor_id".into(), json!(id));
    }
    if let Some(status) = query.status {
        conditions.insert("status".into(), json!(status.as_str()));
    }
    if let Some(category) = query.category {
        conditions.insert("category".into(), json!(category.as_str()));
    }
    if let Some(tag) = &query.tag {
        conditions.insert("tags".into(), json!({ "$any": [tag] }));
    }
    if let Some(search) = &query.search {
        let pattern = search.ilike_pattern();
        conditions.insert(
            "$or".into(),
            json!([
                { "title": { "$ilike": pattern } },
                { "summary": { "$ilike": pattern } },
                { "content": { "$ilike": pattern } },
                { "tags": { "$anyilike": pattern } }
            ]),
        );
    }
    Value::Object(conditions)
}

fn blog_order(sort: BlogSort) -> &'static str {
    match sort {
        BlogSort::Newest => "created_at desc, id asc",
        BlogSort::MostViewed => "view_count desc, created_at desc, id asc",
    }
}

fn into_blogs(rows: Vec<BlogRow>) -> Result<Vec<Blog>, StoreError> {
    rows.into_iter().map(Blog::try_from).collect()
}

fn title_conflict(err: sqlx::Error, title: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("duplicate blog title '{}'", title))
        }
        _ => err.into(),
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn list_courses(&self, query: &CourseQuery) -> Result<Vec<Course>, StoreError> {
        let (where_clause, order) = course_filter(query);
        let rows = Repository::<CourseRow>::new("courses", self.pool.clone())
            .list(where_clause, order, None)
            .await?;
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let mut students = self.students_for(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let set = students.remove(&row.id).unwrap_or_default();
                row.into_course(set)
            })
            .collect())
    }

    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let mut students = self.students_for(&[row.id.clone()]).await?;
                let set = students.remove(&row.id).unwrap_or_default();
                Ok(Some(row.into_course(set)))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for PgStore {
    async fn find_enrollment(&self, user_id: &str) -> Result<Option<EnrollmentRecord>, StoreError> {
        let rows = sqlx::query_as::<_, EnrolledCourseRow>(
            "SELECT * FROM student_courses WHERE user_id = $1 ORDER BY position",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(EnrollmentRecord {
            user_id: user_id.to_string(),
            courses: rows.into_iter().map(EnrolledCourse::from).collect(),
        }))
    }

    async fn enroll(
        &self,
        user_id: &str,
        entry: EnrolledCourse,
        student: CourseStudent,
    ) -> Result<EnrollOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // A concurrent insert of the same pair blocks on the primary key until
        // the first transaction finishes, then sees the conflict.
        let inserted = sqlx::query(
            r#"INSERT INTO student_courses (user_id, course_id, title, instructor_id, instructor_name,
                   date_of_purchase, course_image)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (user_id, course_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(&entry.course_id)
        .bind(&entry.title)
        .bind(&entry.instructor_id)
        .bind(&entry.instructor_name)
        .bind(entry.date_of_purchase)
        .bind(&entry.course_image)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let added = insert_course_student(&mut tx, &entry.course_id, &student).await?;
        if added == 0 {
            debug!("Student {} already listed on course {}", student.student_id, entry.course_id);
        }
        tx.commit().await?;
        Ok(EnrollOutcome::Enrolled)
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn list_blogs(&self, query: &BlogQuery, page: PageRequest) -> Result<Page<Blog>, StoreError> {
        let (rows, total) = self
            .blogs()
            .page(blog_where(query), blog_order(query.sort), page)
            .await?;
        Ok(Page { items: into_blogs(rows)?, pagination: Pagination::new(page, total) })
    }

    async fn top_blogs(&self, query: &BlogQuery, limit: u32) -> Result<Vec<Blog>, StoreError> {
        let rows = self
            .blogs()
            .list(blog_where(query), blog_order(query.sort), Some(limit))
            .await?;
        into_blogs(rows)
    }

    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        // JSON filter params bind as text, so the uuid key goes through a typed query
        let row = sqlx::query_as::<_, BlogRow>("SELECT * FROM blogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Blog::try_from).transpose()
    }

    async fn title_taken(
        &self,
        instructor_id: &str,
        title: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (
                   SELECT 1 FROM blogs
                   WHERE instructor_id = $1 AND title = $2 AND ($3::uuid IS NULL OR id <> $3)
               )"#,
        )
        .bind(instructor_id)
        .bind(title)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO blogs (id, title, summary, content, category, author, image, tags, status,
                   instructor_id, view_count, like_count, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"#,
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.summary)
        .bind(&blog.content)
        .bind(blog.category.as_str())
        .bind(&blog.author)
        .bind(&blog.image)
        .bind(&blog.tags)
        .bind(blog.status.as_str())
        .bind(&blog.instructor_id)
        .bind(blog.view_count)
        .bind(blog.like_count)
        .bind(blog.created_at)
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| title_conflict(e, &blog.title))?;
        Ok(())
    }

    async fn replace_blog(&self, blog: &Blog) -> Result<bool, StoreError> {
        // Counters are owned by record_view/adjust_likes and left untouched here
        let result = sqlx::query(
            r#"UPDATE blogs SET title = $2, summary = $3, content = $4, category = $5, author = $6,
                   image = $7, tags = $8, status = $9, updated_at = $10
               WHERE id = $1"#,
        )
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.summary)
        .bind(&blog.content)
        .bind(blog.category.as_str())
        .bind(&blog.author)
        .bind(&blog.image)
        .bind(&blog.tags)
        .bind(blog.status.as_str())
        .bind(blog.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| title_conflict(e, &blog.title))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_blog(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let row = sqlx::query_as::<_, BlogRow>(
            "UPDATE blogs SET view_count = view_count + 1 WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(BlogStatus::Published.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Blog::try_from).transpose()
    }

    async fn adjust_likes(&self, id: Uuid, delta: i64) -> Result<Option<Blog>, StoreError> {
        let row = sqlx::query_as::<_, BlogRow>(
            "UPDATE blogs SET like_count = GREATEST(like_count + $2, 0) WHERE id = $1 AND status = $3 RETURNING *",
        )
        .bind(id)
        .bind(delta)
        .bind(BlogStatus::Published.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Blog::try_from).transpose()
    }
}
