//! Shared plumbing for the database-backed suites. Tests run against the
//! database named by `TEST_DATABASE_URL` and skip when it is unset, so the
//! unit suites stay runnable without infrastructure. Seed rows get unique
//! suffixes instead of truncating shared tables, so suites can run in
//! parallel against one database.

use fitcoach::{
    courses::repo::{self as courses_repo, Course, NewCourse},
    credit_packages::repo::{self as packages_repo, CreditPackage},
    skills::repo as skills_repo,
    users::repo::{self as users_repo, User},
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

pub async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping database-backed test");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to the integration database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations on the integration database");
    Some(pool)
}

pub async fn seed_user(pool: &PgPool, role: &str) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let name = format!("t{}", &suffix[..8]);
    let email = format!("{suffix}@test.example.com");
    users_repo::insert(pool, &name, &email, role, "$argon2-test-hash")
        .await
        .expect("seed user should insert")
}

pub async fn seed_skill(pool: &PgPool) -> Uuid {
    let name = format!("skill-{}", Uuid::new_v4().simple());
    skills_repo::insert(pool, &name)
        .await
        .expect("seed skill should insert")
        .id
}

pub async fn seed_course(pool: &PgPool, coach_id: Uuid, max_participants: i32) -> Course {
    let skill_id = seed_skill(pool).await;
    let start = OffsetDateTime::now_utc() + Duration::days(7);
    let name = format!("course-{}", Uuid::new_v4().simple());
    courses_repo::insert(
        pool,
        NewCourse {
            user_id: coach_id,
            skill_id,
            name: &name,
            description: "integration seed",
            start_at: start,
            end_at: start + Duration::hours(2),
            max_participants,
            meeting_url: "https://meet.example.com/seed",
        },
    )
    .await
    .expect("seed course should insert")
}

pub async fn seed_package(pool: &PgPool, credit_amount: i32, price: i32) -> CreditPackage {
    let name = format!("pack-{}", Uuid::new_v4().simple());
    packages_repo::insert(pool, &name, credit_amount, price)
        .await
        .expect("seed package should insert")
}

/// Grants `credits` to the user through a real purchase record.
pub async fn grant_credits(pool: &PgPool, user_id: Uuid, credits: i32) {
    let package = seed_package(pool, credits, credits * 100).await;
    packages_repo::insert_purchase(pool, user_id, &package)
        .await
        .expect("seed purchase should insert");
}
