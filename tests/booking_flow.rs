//! Booking accounting against a real Postgres: soft-delete rebooking, the
//! one-active-booking-per-course guard, credit exhaustion, and the
//! concurrent-booking race on the last seat.

use fitcoach::{
    courses::booking::{self, BookingError, CancelError},
    credit_packages::repo as packages_repo,
    users::repo::{ROLE_COACH, ROLE_USER},
};

#[path = "common/mod.rs"]
mod common;

#[tokio::test]
async fn rebooking_after_cancel_succeeds() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let course = common::seed_course(&pool, coach.id, 5).await;
    let student = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, student.id, 1).await;

    booking::book(&pool, student.id, course.id)
        .await
        .expect("first booking should succeed");

    let again = booking::book(&pool, student.id, course.id).await;
    assert!(
        matches!(again, Err(BookingError::AlreadyBooked)),
        "second booking without cancelling must be rejected, got {again:?}"
    );

    booking::cancel(&pool, student.id, course.id)
        .await
        .expect("cancel should succeed");

    // The cancelled row freed both the seat and the single credit.
    booking::book(&pool, student.id, course.id)
        .await
        .expect("rebooking after cancel should succeed");

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM course_bookings WHERE user_id = $1 AND course_id = $2",
    )
    .bind(student.id)
    .bind(course.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(rows, 2, "cancelled booking must stay behind as history");
}

#[tokio::test]
async fn booking_without_any_purchase_is_rejected() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let course = common::seed_course(&pool, coach.id, 5).await;
    let student = common::seed_user(&pool, ROLE_USER).await;

    let result = booking::book(&pool, student.id, course.id).await;
    assert!(matches!(result, Err(BookingError::NoCreditsLeft)));
}

#[tokio::test]
async fn credits_cap_total_active_bookings() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let student = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, student.id, 2).await;

    let first = common::seed_course(&pool, coach.id, 5).await;
    let second = common::seed_course(&pool, coach.id, 5).await;
    let third = common::seed_course(&pool, coach.id, 5).await;

    booking::book(&pool, student.id, first.id).await.expect("credit 1");
    booking::book(&pool, student.id, second.id).await.expect("credit 2");

    let over = booking::book(&pool, student.id, third.id).await;
    assert!(
        matches!(over, Err(BookingError::NoCreditsLeft)),
        "third booking on two credits must be rejected, got {over:?}"
    );

    // Cancelling one booking frees a credit for a different course.
    booking::cancel(&pool, student.id, first.id).await.expect("cancel");
    booking::book(&pool, student.id, third.id)
        .await
        .expect("freed credit should be usable again");
}

#[tokio::test]
async fn full_course_rejects_further_bookings() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let course = common::seed_course(&pool, coach.id, 1).await;

    let first = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, first.id, 1).await;
    let second = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, second.id, 1).await;

    booking::book(&pool, first.id, course.id).await.expect("seat 1");

    let result = booking::book(&pool, second.id, course.id).await;
    assert!(matches!(result, Err(BookingError::CourseFull)));
}

#[tokio::test]
async fn concurrent_bookings_for_the_last_seat_admit_exactly_one() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let course = common::seed_course(&pool, coach.id, 1).await;

    let first = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, first.id, 1).await;
    let second = common::seed_user(&pool, ROLE_USER).await;
    common::grant_credits(&pool, second.id, 1).await;

    let (a, b) = tokio::join!(
        booking::book(&pool, first.id, course.id),
        booking::book(&pool, second.id, course.id),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of two racers may take the last seat: {a:?} / {b:?}");
    for result in [a, b] {
        if let Err(e) = result {
            assert!(matches!(e, BookingError::CourseFull), "loser must see a full course, got {e:?}");
        }
    }

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM course_bookings WHERE course_id = $1 AND cancelled_at IS NULL",
    )
    .bind(course.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(active, 1);
}

#[tokio::test]
async fn cancelling_without_an_active_booking_fails() {
    let Some(pool) = common::try_pool().await else { return };
    let coach = common::seed_user(&pool, ROLE_COACH).await;
    let course = common::seed_course(&pool, coach.id, 5).await;
    let student = common::seed_user(&pool, ROLE_USER).await;

    let result = booking::cancel(&pool, student.id, course.id).await;
    assert!(matches!(result, Err(CancelError::NotBooked)));
}

#[tokio::test]
async fn booking_a_missing_course_fails_before_any_credit_check() {
    let Some(pool) = common::try_pool().await else { return };
    let student = common::seed_user(&pool, ROLE_USER).await;

    let result = booking::book(&pool, student.id, uuid::Uuid::new_v4()).await;
    assert!(matches!(result, Err(BookingError::CourseNotFound)));
}

#[tokio::test]
async fn purchase_freezes_package_values() {
    let Some(pool) = common::try_pool().await else { return };
    let student = common::seed_user(&pool, ROLE_USER).await;
    let package = common::seed_package(&pool, 10, 1000).await;

    let purchase = packages_repo::insert_purchase(&pool, student.id, &package)
        .await
        .expect("purchase should insert");
    assert_eq!(purchase.purchased_credits, 10);
    assert_eq!(purchase.price_paid, 1000);

    // A later package edit must not rewrite the issued purchase.
    sqlx::query("UPDATE credit_packages SET credit_amount = 99, price = 1 WHERE id = $1")
        .bind(package.id)
        .execute(&pool)
        .await
        .unwrap();

    let (credits, paid): (i32, i32) = sqlx::query_as(
        "SELECT purchased_credits, price_paid FROM credit_purchases WHERE id = $1",
    )
    .bind(purchase.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!((credits, paid), (10, 1000));
}
