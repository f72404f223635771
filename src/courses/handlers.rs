use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    response,
    state::AppState,
    validation,
};

use super::{
    booking::{self, BookingError, CancelError},
    dto::CourseListItem,
    repo,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:course_id", post(book_course).delete(cancel_booking))
}

#[instrument(skip(state))]
pub async fn list_courses(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let rows = repo::list_with_names(&state.db).await?;
    let items: Vec<CourseListItem> = rows
        .into_iter()
        .map(|row| CourseListItem {
            id: row.id,
            name: row.name,
            description: row.description,
            start_at: row.start_at,
            end_at: row.end_at,
            max_participants: row.max_participants,
            coach_name: row.coach_name,
            skill_name: row.skill_name,
        })
        .collect();
    Ok(response::ok(items))
}

#[instrument(skip(state, user))]
pub async fn book_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let course_id = validation::uuid(&course_id).map_err(|_| ApiError::bad_request("ID錯誤"))?;

    booking::book(&state.db, user.id, course_id)
        .await
        .map_err(|e| match e {
            BookingError::CourseNotFound => ApiError::bad_request("課程不存在"),
            BookingError::AlreadyBooked => ApiError::bad_request("已經報名過此課程"),
            BookingError::NoCreditsLeft => ApiError::bad_request("已無可使用堂數"),
            BookingError::CourseFull => ApiError::bad_request("已達最大參加人數，無法參加"),
            BookingError::Database(e) => ApiError::Database(e),
        })?;

    Ok(response::created_empty())
}

#[instrument(skip(state, user))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let course_id = validation::uuid(&course_id).map_err(|_| ApiError::bad_request("ID錯誤"))?;

    booking::cancel(&state.db, user.id, course_id)
        .await
        .map_err(|e| match e {
            CancelError::NotBooked => ApiError::bad_request("課程不存在"),
            CancelError::Lost => ApiError::bad_request("取消失敗"),
            CancelError::Database(e) => ApiError::Database(e),
        })?;

    Ok(response::ok_empty())
}
