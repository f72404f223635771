use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Skill>> {
    let skills = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, name, created_at
        FROM skills
        ORDER BY created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(skills)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Skill>> {
    let skill = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, name, created_at
        FROM skills
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(skill)
}

pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Skill>> {
    let skill = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, name, created_at
        FROM skills
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await?;
    Ok(skill)
}

pub async fn insert(db: &PgPool, name: &str) -> anyhow::Result<Skill> {
    let skill = sqlx::query_as::<_, Skill>(
        r#"
        INSERT INTO skills (name)
        VALUES ($1)
        RETURNING id, name, created_at
        "#,
    )
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(skill)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
