use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

pub const ROLE_USER: &str = "USER";
pub const ROLE_COACH: &str = "COACH";

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn is_coach(&self) -> bool {
        self.role == ROLE_COACH
    }
}

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, password_hash, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, password_hash, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    email: &str,
    role: &str,
    password_hash: &str,
) -> anyhow::Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, role, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, role, password_hash, created_at, updated_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(role)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(user)
}

/// Rename guarded by the previous name so a concurrent rename surfaces as
/// zero affected rows instead of silently winning.
pub async fn update_name(
    db: &PgPool,
    id: Uuid,
    old_name: &str,
    new_name: &str,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = $1, updated_at = now()
        WHERE id = $2 AND name = $3
        "#,
    )
    .bind(new_name)
    .bind(id)
    .bind(old_name)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
