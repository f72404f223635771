use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::instrument;

use crate::{
    error::{ApiError, ApiResult},
    extract::ApiQuery,
    response,
    state::AppState,
    users, validation,
};

use super::{
    dto::{CoachDetailData, CoachListItem, CoachListQuery, CoachOwner},
    repo,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coaches", get(list_coaches))
        .route("/coaches/:coach_id", get(get_coach))
}

fn parse_page_param(value: Option<&str>) -> Result<i64, ApiError> {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ApiError::bad_request("欄位未填寫正確"))
}

#[instrument(skip(state, query))]
pub async fn list_coaches(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CoachListQuery>,
) -> ApiResult<impl IntoResponse> {
    let per = parse_page_param(query.per.as_deref())?;
    let page = parse_page_param(query.page.as_deref())?;
    if per < 0 || page < 1 {
        return Err(ApiError::bad_request("欄位未填寫正確"));
    }
    let offset = per
        .checked_mul(page - 1)
        .ok_or_else(|| ApiError::bad_request("欄位未填寫正確"))?;

    let rows = repo::list_page(&state.db, per, offset).await?;
    let items: Vec<CoachListItem> = rows
        .into_iter()
        .map(|row| CoachListItem {
            id: row.id,
            name: row.name,
        })
        .collect();
    Ok(response::ok(items))
}

#[instrument(skip(state))]
pub async fn get_coach(
    State(state): State<AppState>,
    Path(coach_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let coach_id =
        validation::uuid(&coach_id).map_err(|_| ApiError::bad_request("欄位未填寫正確"))?;

    let coach = repo::find_by_id(&state.db, coach_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("找不到該教練"))?;

    let user = users::repo::find_by_id(&state.db, coach.user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("coach {} references a missing user", coach.id))?;

    Ok(response::ok(CoachDetailData {
        user: CoachOwner {
            name: user.name,
            role: user.role,
        },
        coach,
    }))
}

#[cfg(test)]
mod tests {
    use super::repo::Coach;
    use super::*;

    #[test]
    fn page_params_must_be_present_and_numeric() {
        assert!(parse_page_param(Some("3")).is_ok());
        assert!(parse_page_param(Some("0")).is_ok());
        assert!(parse_page_param(None).is_err());
        assert!(parse_page_param(Some("")).is_err());
        assert!(parse_page_param(Some("3.5")).is_err());
        assert!(parse_page_param(Some("many")).is_err());
    }

    #[test]
    fn coach_detail_payload_nests_user_and_coach() {
        let coach = Coach {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            experience_years: 7,
            description: "攀岩與重訓".into(),
            profile_image_url: None,
            created_at: time::macros::datetime!(2024-03-01 09:00 UTC),
            updated_at: time::macros::datetime!(2024-03-01 09:00 UTC),
        };
        let data = CoachDetailData {
            user: CoachOwner {
                name: "小美".into(),
                role: "COACH".into(),
            },
            coach,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user"]["role"], "COACH");
        assert_eq!(json["coach"]["experience_years"], 7);
        assert!(json["coach"]["profile_image_url"].is_null());
        assert!(json["coach"]["created_at"].as_str().unwrap().starts_with("2024-03-01"));
    }
}
