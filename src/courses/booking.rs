//! Booking eligibility and soft-delete cancellation.
//!
//! Seats and credits are never tracked in counters. Both are derived live
//! from the active rows of `course_bookings` (`cancelled_at IS NULL`), so
//! cancelling a booking frees its seat and its credit with no extra
//! bookkeeping that could drift out of sync with the booking set.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("course does not exist")]
    CourseNotFound,
    #[error("user already holds an active booking for this course")]
    AlreadyBooked,
    #[error("all purchased credits are in use")]
    NoCreditsLeft,
    #[error("course is at max participants")]
    CourseFull,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CancelError {
    #[error("no active booking for this course")]
    NotBooked,
    #[error("booking was cancelled concurrently")]
    Lost,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Live counts a booking decision is made from. All fields are read inside
/// one transaction, so they describe a single consistent instant.
#[derive(Debug, Clone, Copy)]
pub struct BookingSnapshot {
    /// The user already holds an active booking for this course.
    pub already_booked: bool,
    /// Sum of `purchased_credits` over every purchase the user ever made.
    pub granted_credits: i64,
    /// The user's active bookings across all courses; each consumes a credit.
    pub used_credits: i64,
    pub max_participants: i32,
    /// Active bookings currently holding a seat in this course.
    pub course_active: i64,
}

/// The booking rule. Check order is observable through the failure reason:
/// an already-booked user is told so even when out of credits, and the
/// credit check runs before the capacity check.
pub fn evaluate(snapshot: &BookingSnapshot) -> Result<(), BookingError> {
    if snapshot.already_booked {
        return Err(BookingError::AlreadyBooked);
    }
    if snapshot.used_credits >= snapshot.granted_credits {
        return Err(BookingError::NoCreditsLeft);
    }
    if snapshot.course_active >= i64::from(snapshot.max_participants) {
        return Err(BookingError::CourseFull);
    }
    Ok(())
}

/// Books `course_id` for `user_id` if the eligibility rule passes.
///
/// The whole check-then-insert runs in one transaction holding row locks on
/// the user and then the course (always in that order). Concurrent bookings
/// for the last seat of a course, or the last credit of a user, serialize on
/// those locks and the loser sees the winner's row in its snapshot.
pub async fn book(db: &PgPool, user_id: Uuid, course_id: Uuid) -> Result<(), BookingError> {
    let mut tx = db.begin().await?;

    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let max_participants = sqlx::query_scalar::<_, i32>(
        "SELECT max_participants FROM courses WHERE id = $1 FOR UPDATE",
    )
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(BookingError::CourseNotFound)?;

    let snapshot = load_snapshot(&mut tx, user_id, course_id, max_participants).await?;
    evaluate(&snapshot)?;

    sqlx::query("INSERT INTO course_bookings (user_id, course_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(%user_id, %course_id, "course booked");
    Ok(())
}

async fn load_snapshot(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    course_id: Uuid,
    max_participants: i32,
) -> Result<BookingSnapshot, sqlx::Error> {
    let already_booked = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM course_bookings
            WHERE user_id = $1 AND course_id = $2 AND cancelled_at IS NULL
        )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(&mut **tx)
    .await?;

    let granted_credits = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(purchased_credits), 0) FROM credit_purchases WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    let used_credits = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM course_bookings WHERE user_id = $1 AND cancelled_at IS NULL",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    let course_active = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM course_bookings WHERE course_id = $1 AND cancelled_at IS NULL",
    )
    .bind(course_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(BookingSnapshot {
        already_booked,
        granted_credits,
        used_credits,
        max_participants,
        course_active,
    })
}

/// Cancels the caller's active booking by stamping `cancelled_at`. The row
/// stays behind for history; the freed seat and credit simply fall out of
/// the live counts.
pub async fn cancel(db: &PgPool, user_id: Uuid, course_id: Uuid) -> Result<(), CancelError> {
    let has_active = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM course_bookings
            WHERE user_id = $1 AND course_id = $2 AND cancelled_at IS NULL
        )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await?;
    if !has_active {
        return Err(CancelError::NotBooked);
    }

    let result = sqlx::query(
        r#"
        UPDATE course_bookings
        SET cancelled_at = now()
        WHERE user_id = $1 AND course_id = $2 AND cancelled_at IS NULL
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(CancelError::Lost);
    }
    info!(%user_id, %course_id, "booking cancelled");
    Ok(())
}
