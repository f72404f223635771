//! USER→COACH promotion. The role flip and the coach insert share one
//! transaction so a failed insert cannot strand a COACH role without its
//! coach row.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    coaches::repo::Coach,
    users::repo::{ROLE_COACH, ROLE_USER},
};

#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    #[error("user does not exist")]
    UserNotFound,
    #[error("user already has the coach role")]
    AlreadyCoach,
    #[error("role update affected no rows")]
    LostUpdate,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug)]
pub struct Promotion {
    pub user_name: String,
    pub user_role: String,
    pub coach: Coach,
}

pub struct NewCoach<'a> {
    pub experience_years: i32,
    pub description: &'a str,
    pub profile_image_url: Option<&'a str>,
}

/// Promotes `user_id` and creates the coach record.
///
/// The role UPDATE is guarded by `role = 'USER'` and its affected-row count
/// is re-checked. Zero rows after the existence check passed means a
/// concurrent promotion won the race; that failure is distinct from
/// not-found.
pub async fn promote(
    db: &PgPool,
    user_id: Uuid,
    new_coach: NewCoach<'_>,
) -> Result<Promotion, PromoteError> {
    let mut tx = db.begin().await?;

    let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(PromoteError::UserNotFound)?;
    if role == ROLE_COACH {
        return Err(PromoteError::AlreadyCoach);
    }

    let updated = sqlx::query(
        "UPDATE users SET role = $1, updated_at = now() WHERE id = $2 AND role = $3",
    )
    .bind(ROLE_COACH)
    .bind(user_id)
    .bind(ROLE_USER)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(PromoteError::LostUpdate);
    }

    let coach = sqlx::query_as::<_, Coach>(
        r#"
        INSERT INTO coaches (user_id, experience_years, description, profile_image_url)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, experience_years, description, profile_image_url,
                  created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(new_coach.experience_years)
    .bind(new_coach.description)
    .bind(new_coach.profile_image_url)
    .fetch_one(&mut *tx)
    .await?;

    let user_name = sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(%user_id, coach_id = %coach.id, "user promoted to coach");

    Ok(Promotion {
        user_name,
        user_role: ROLE_COACH.to_string(),
        coach,
    })
}
