use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Idempotent DDL, applied in order by `migrate`.
///
/// A student's enrollment record is the set of `student_courses` rows with
/// their `user_id`, ordered by `position`. The composite primary keys are what
/// make the conditional enrollment insert safe under concurrency.
const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS courses (
        id               TEXT PRIMARY KEY,
        instructor_id    TEXT NOT NULL,
        instructor_name  TEXT NOT NULL,
        date             TIMESTAMPTZ,
        title            TEXT NOT NULL,
        category         TEXT NOT NULL DEFAULT '',
        level            TEXT NOT NULL DEFAULT '',
        primary_language TEXT NOT NULL DEFAULT '',
        subtitle         TEXT NOT NULL DEFAULT '',
        description      TEXT NOT NULL DEFAULT '',
        image            TEXT NOT NULL DEFAULT '',
        welcome_message  TEXT NOT NULL DEFAULT '',
        pricing          NUMERIC(12, 2) NOT NULL CHECK (pricing >= 0),
        objectives       TEXT NOT NULL DEFAULT '',
        curriculum       JSONB NOT NULL DEFAULT '[]'::jsonb,
        is_published     BOOLEAN NOT NULL DEFAULT FALSE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS course_students (
        course_id     TEXT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
        student_id    TEXT NOT NULL,
        student_name  TEXT NOT NULL,
        student_email TEXT NOT NULL,
        paid_amount   NUMERIC(12, 2) NOT NULL DEFAULT 0,
        position      BIGSERIAL,
        PRIMARY KEY (course_id, student_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS student_courses (
        user_id          TEXT NOT NULL,
        course_id        TEXT NOT NULL,
        title            TEXT NOT NULL,
        instructor_id    TEXT NOT NULL,
        instructor_name  TEXT NOT NULL,
        date_of_purchase TIMESTAMPTZ NOT NULL,
        course_image     TEXT NOT NULL DEFAULT '',
        position         BIGSERIAL,
        PRIMARY KEY (user_id, course_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS blogs (
        id            UUID PRIMARY KEY,
        title         TEXT NOT NULL,
        summary       TEXT NOT NULL DEFAULT '',
        content       TEXT NOT NULL,
        category      TEXT NOT NULL,
        author        TEXT NOT NULL,
        image         TEXT NOT NULL DEFAULT '',
        tags          TEXT[] NOT NULL DEFAULT '{}',
        status        TEXT NOT NULL,
        instructor_id TEXT NOT NULL,
        view_count    BIGINT NOT NULL DEFAULT 0 CHECK (view_count >= 0),
        like_count    BIGINT NOT NULL DEFAULT 0 CHECK (like_count >= 0),
        created_at    TIMESTAMPTZ NOT NULL,
        updated_at    TIMESTAMPTZ NOT NULL,
        UNIQUE (instructor_id, title)
    )"#,
    "CREATE INDEX IF NOT EXISTS blogs_status_created_idx ON blogs (status, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS blogs_tags_idx ON blogs USING GIN (tags)",
];

/// Creates every table and index that does not exist yet.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Schema up to date ({} statements applied)", STATEMENTS.len());
    Ok(())
}
