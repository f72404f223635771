//! Coach promotion against a real Postgres: the one-way USER→COACH
//! transition, its conflict cases, and the affected-row guard under a
//! concurrent promotion.

use fitcoach::{
    admin::promote::{self, NewCoach, PromoteError},
    users::repo::{ROLE_COACH, ROLE_USER},
};

#[path = "common/mod.rs"]
mod common;

fn new_coach() -> NewCoach<'static> {
    NewCoach {
        experience_years: 3,
        description: "integration seed coach",
        profile_image_url: None,
    }
}

#[tokio::test]
async fn promotion_flips_role_and_creates_coach_row() {
    let Some(pool) = common::try_pool().await else { return };
    let user = common::seed_user(&pool, ROLE_USER).await;

    let promotion = promote::promote(&pool, user.id, new_coach())
        .await
        .expect("promotion should succeed");
    assert_eq!(promotion.user_name, user.name);
    assert_eq!(promotion.user_role, ROLE_COACH);
    assert_eq!(promotion.coach.user_id, user.id);
    assert_eq!(promotion.coach.experience_years, 3);
    assert!(promotion.coach.profile_image_url.is_none());

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, ROLE_COACH);
}

#[tokio::test]
async fn promoting_an_unknown_user_is_not_found() {
    let Some(pool) = common::try_pool().await else { return };

    let result = promote::promote(&pool, uuid::Uuid::new_v4(), new_coach()).await;
    assert!(matches!(result, Err(PromoteError::UserNotFound)));
}

#[tokio::test]
async fn promoting_twice_is_a_conflict() {
    let Some(pool) = common::try_pool().await else { return };
    let user = common::seed_user(&pool, ROLE_USER).await;

    promote::promote(&pool, user.id, new_coach())
        .await
        .expect("first promotion should succeed");

    let again = promote::promote(&pool, user.id, new_coach()).await;
    assert!(
        matches!(again, Err(PromoteError::AlreadyCoach)),
        "second promotion must conflict, got {again:?}"
    );
}

#[tokio::test]
async fn concurrent_promotions_create_exactly_one_coach() {
    let Some(pool) = common::try_pool().await else { return };
    let user = common::seed_user(&pool, ROLE_USER).await;

    let (a, b) = tokio::join!(
        promote::promote(&pool, user.id, new_coach()),
        promote::promote(&pool, user.id, new_coach()),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racer may promote: {a:?} / {b:?}");
    for result in [a, b] {
        if let Err(e) = result {
            // The loser either saw the committed COACH role or lost the
            // guarded update; both are distinct from not-found.
            assert!(
                matches!(e, PromoteError::AlreadyCoach | PromoteError::LostUpdate),
                "unexpected loser error: {e:?}"
            );
        }
    }

    let coach_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coaches WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(coach_rows, 1);
}
