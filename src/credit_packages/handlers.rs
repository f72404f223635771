use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response,
    state::AppState,
    validation,
};

use super::{
    dto::{CreatePackageRequest, PackageItem},
    repo,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credit-package", get(list_packages).post(create_package))
        .route(
            "/credit-package/:credit_package_id",
            post(purchase_package).delete(delete_package),
        )
}

#[instrument(skip(state))]
pub async fn list_packages(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let packages = repo::list(&state.db).await?;
    let items: Vec<PackageItem> = packages
        .into_iter()
        .map(|p| PackageItem {
            id: p.id,
            name: p.name,
            credit_amount: p.credit_amount,
            price: p.price,
        })
        .collect();
    Ok(response::ok(items))
}

#[instrument(skip(state, req))]
pub async fn create_package(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePackageRequest>,
) -> ApiResult<impl IntoResponse> {
    if validation::non_blank(&req.name).is_err()
        || validation::non_negative(req.credit_amount).is_err()
        || validation::non_negative(req.price).is_err()
    {
        return Err(ApiError::bad_request("欄位未填寫正確"));
    }
    if repo::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::conflict("資料重複"));
    }

    let package = repo::insert(&state.db, &req.name, req.credit_amount, req.price).await?;
    info!(package_id = %package.id, "credit package created");

    // Create responds 200, not 201.
    Ok(response::ok(PackageItem {
        id: package.id,
        name: package.name,
        credit_amount: package.credit_amount,
        price: package.price,
    }))
}

#[instrument(skip(state))]
pub async fn delete_package(
    State(state): State<AppState>,
    Path(credit_package_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let credit_package_id =
        validation::uuid(&credit_package_id).map_err(|_| ApiError::bad_request("ID錯誤"))?;

    let deleted = repo::delete(&state.db, credit_package_id).await?;
    if deleted == 0 {
        return Err(ApiError::bad_request("ID錯誤"));
    }
    info!(%credit_package_id, "credit package deleted");

    Ok(response::ok_empty())
}

#[instrument(skip(state, user))]
pub async fn purchase_package(
    State(state): State<AppState>,
    user: AuthUser,
    Path(credit_package_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let credit_package_id =
        validation::uuid(&credit_package_id).map_err(|_| ApiError::bad_request("ID錯誤"))?;

    let package = repo::find_by_id(&state.db, credit_package_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("ID錯誤"))?;

    let purchase = repo::insert_purchase(&state.db, user.id, &package).await?;
    info!(
        user_id = %user.id,
        package_id = %package.id,
        credits = purchase.purchased_credits,
        "credits purchased"
    );

    Ok(response::created_empty())
}
