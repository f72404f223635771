use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub credit_amount: i32,
    pub price: i32,
}

/// Package as listed and as returned on create. No timestamps leak out.
#[derive(Debug, Serialize)]
pub struct PackageItem {
    pub id: Uuid,
    pub name: String,
    pub credit_amount: i32,
    pub price: i32,
}
