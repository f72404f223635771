use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response,
    state::AppState,
    validation,
};

use super::{
    dto::{CreateSkillRequest, SkillItem},
    repo,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skill", get(list_skills).post(create_skill))
        .route("/skill/:skill_id", delete(delete_skill))
}

#[instrument(skip(state))]
pub async fn list_skills(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let skills = repo::list(&state.db).await?;
    let items: Vec<SkillItem> = skills
        .into_iter()
        .map(|skill| SkillItem {
            id: skill.id,
            name: skill.name,
        })
        .collect();
    Ok(response::ok(items))
}

#[instrument(skip(state, req))]
pub async fn create_skill(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateSkillRequest>,
) -> ApiResult<impl IntoResponse> {
    if validation::non_blank(&req.name).is_err() {
        return Err(ApiError::bad_request("欄位未填寫正確"));
    }
    if repo::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::conflict("資料重複"));
    }

    let skill = repo::insert(&state.db, &req.name).await?;
    info!(skill_id = %skill.id, "skill created");

    Ok(response::ok(SkillItem {
        id: skill.id,
        name: skill.name,
    }))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    Path(skill_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let skill_id = validation::uuid(&skill_id).map_err(|_| ApiError::bad_request("ID錯誤"))?;

    let deleted = repo::delete(&state.db, skill_id).await?;
    if deleted == 0 {
        return Err(ApiError::bad_request("ID錯誤"));
    }
    info!(%skill_id, "skill deleted");

    Ok(response::ok_empty())
}
