use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Course record as stored. `user_id` is the owning coach.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_at: OffsetDateTime,
    pub max_participants: i32,
    pub meeting_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Course row joined with its coach and skill names for the public list.
#[derive(Debug, FromRow)]
pub struct CourseListRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
    pub max_participants: i32,
    pub coach_name: String,
    pub skill_name: String,
}

pub struct NewCourse<'a> {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
    pub max_participants: i32,
    pub meeting_url: &'a str,
}

/// Updates are full-replace: every mutable field is written on each update.
pub struct CourseChanges<'a> {
    pub skill_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub start_at: OffsetDateTime,
    pub end_at: OffsetDateTime,
    pub max_participants: i32,
    pub meeting_url: &'a str,
}

pub async fn list_with_names(db: &PgPool) -> anyhow::Result<Vec<CourseListRow>> {
    let rows = sqlx::query_as::<_, CourseListRow>(
        r#"
        SELECT co.id, co.name, co.description, co.start_at, co.end_at,
               co.max_participants, u.name AS coach_name, s.name AS skill_name
        FROM courses co
        JOIN users u ON u.id = co.user_id
        JOIN skills s ON s.id = co.skill_id
        ORDER BY co.created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Course>> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, user_id, skill_id, name, description, start_at, end_at,
               max_participants, meeting_url, created_at, updated_at
        FROM courses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(course)
}

pub async fn insert(db: &PgPool, new: NewCourse<'_>) -> anyhow::Result<Course> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses
            (user_id, skill_id, name, description, start_at, end_at,
             max_participants, meeting_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, skill_id, name, description, start_at, end_at,
                  max_participants, meeting_url, created_at, updated_at
        "#,
    )
    .bind(new.user_id)
    .bind(new.skill_id)
    .bind(new.name)
    .bind(new.description)
    .bind(new.start_at)
    .bind(new.end_at)
    .bind(new.max_participants)
    .bind(new.meeting_url)
    .fetch_one(db)
    .await?;
    Ok(course)
}

pub async fn update_full(
    db: &PgPool,
    id: Uuid,
    changes: CourseChanges<'_>,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET skill_id = $1, name = $2, description = $3, start_at = $4, end_at = $5,
            max_participants = $6, meeting_url = $7, updated_at = now()
        WHERE id = $8
        "#,
    )
    .bind(changes.skill_id)
    .bind(changes.name)
    .bind(changes.description)
    .bind(changes.start_at)
    .bind(changes.end_at)
    .bind(changes.max_participants)
    .bind(changes.meeting_url)
    .bind(id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
