use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Coach record. Created exactly once per user by the promotion flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Coach {
    pub id: Uuid,
    pub user_id: Uuid,
    pub experience_years: i32,
    pub description: String,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One page row: coach id plus the joined user name.
#[derive(Debug, FromRow)]
pub struct CoachListRow {
    pub id: Uuid,
    pub name: String,
}

/// Pages are ordered by promotion time so repeated queries see stable pages.
pub async fn list_page(db: &PgPool, limit: i64, offset: i64) -> anyhow::Result<Vec<CoachListRow>> {
    let rows = sqlx::query_as::<_, CoachListRow>(
        r#"
        SELECT c.id, u.name
        FROM coaches c
        JOIN users u ON u.id = c.user_id
        ORDER BY c.created_at
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Coach>> {
    let coach = sqlx::query_as::<_, Coach>(
        r#"
        SELECT id, user_id, experience_years, description, profile_image_url,
               created_at, updated_at
        FROM coaches
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(coach)
}
