use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditPackage {
    pub id: Uuid,
    pub name: String,
    pub credit_amount: i32,
    pub price: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A credit grant. Append-only: rows copy the package's values at purchase
/// time, so editing or deleting a package never rewrites issued credits.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditPurchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub credit_package_id: Uuid,
    pub purchased_credits: i32,
    pub price_paid: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub purchase_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn list(db: &PgPool) -> anyhow::Result<Vec<CreditPackage>> {
    let packages = sqlx::query_as::<_, CreditPackage>(
        r#"
        SELECT id, name, credit_amount, price, created_at
        FROM credit_packages
        ORDER BY created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(packages)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<CreditPackage>> {
    let package = sqlx::query_as::<_, CreditPackage>(
        r#"
        SELECT id, name, credit_amount, price, created_at
        FROM credit_packages
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(package)
}

pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<CreditPackage>> {
    let package = sqlx::query_as::<_, CreditPackage>(
        r#"
        SELECT id, name, credit_amount, price, created_at
        FROM credit_packages
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await?;
    Ok(package)
}

pub async fn insert(
    db: &PgPool,
    name: &str,
    credit_amount: i32,
    price: i32,
) -> anyhow::Result<CreditPackage> {
    let package = sqlx::query_as::<_, CreditPackage>(
        r#"
        INSERT INTO credit_packages (name, credit_amount, price)
        VALUES ($1, $2, $3)
        RETURNING id, name, credit_amount, price, created_at
        "#,
    )
    .bind(name)
    .bind(credit_amount)
    .bind(price)
    .fetch_one(db)
    .await?;
    Ok(package)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM credit_packages WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Records a purchase with the package's current values frozen in.
pub async fn insert_purchase(
    db: &PgPool,
    user_id: Uuid,
    package: &CreditPackage,
) -> anyhow::Result<CreditPurchase> {
    let purchase = sqlx::query_as::<_, CreditPurchase>(
        r#"
        INSERT INTO credit_purchases
            (user_id, credit_package_id, purchased_credits, price_paid)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, credit_package_id, purchased_credits, price_paid,
                  purchase_at, created_at
        "#,
    )
    .bind(user_id)
    .bind(package.id)
    .bind(package.credit_amount)
    .bind(package.price)
    .fetch_one(db)
    .await?;
    Ok(purchase)
}
