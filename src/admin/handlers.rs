use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{post, put},
    Router,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::{AuthUser, CoachUser},
    courses::repo::{self as courses_repo, CourseChanges, NewCourse},
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response,
    skills::repo as skills_repo,
    state::AppState,
    users::repo as users_repo,
    validation,
};

use super::{
    dto::{
        CourseData, CreateCourseRequest, PromoteData, PromoteRequest, PromotedUser,
        SavedCourseData, UpdateCourseRequest,
    },
    promote::{self, NewCoach, PromoteError},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/coaches/:user_id", post(promote_coach))
        .route("/admin/coaches/courses", post(create_course))
        .route("/admin/coaches/courses/:course_id", put(update_course))
}

fn field_error() -> ApiError {
    ApiError::bad_request("欄位未填寫正確")
}

/// Schedule fields arrive as strings; anything that is not RFC 3339 is a
/// plain field failure rather than a storage error.
fn parse_schedule(value: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| field_error())
}

#[instrument(skip(state, req))]
pub async fn promote_coach(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<PromoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_id = validation::uuid(&user_id).map_err(|_| field_error())?;
    if validation::non_negative(req.experience_years).is_err()
        || validation::non_blank(&req.description).is_err()
    {
        return Err(field_error());
    }
    if let Some(url) = req.profile_image_url.as_deref() {
        if validation::secure_url(url).is_err() {
            return Err(ApiError::bad_request("大頭貼網址錯誤"));
        }
    }

    let promotion = promote::promote(
        &state.db,
        user_id,
        NewCoach {
            experience_years: req.experience_years,
            description: &req.description,
            profile_image_url: req.profile_image_url.as_deref(),
        },
    )
    .await
    .map_err(|e| match e {
        PromoteError::UserNotFound => ApiError::bad_request("使用者不存在"),
        PromoteError::AlreadyCoach => ApiError::conflict("使用者已經是教練"),
        PromoteError::LostUpdate => ApiError::bad_request("更新使用者失敗"),
        PromoteError::Database(e) => ApiError::Database(e),
    })?;

    Ok(response::created(PromoteData {
        user: PromotedUser {
            name: promotion.user_name,
            role: promotion.user_role,
        },
        coach: promotion.coach,
    }))
}

struct CourseFields {
    skill_id: Uuid,
    start_at: OffsetDateTime,
    end_at: OffsetDateTime,
}

fn check_course_fields(
    skill_id: &str,
    name: &str,
    description: &str,
    start_at: &str,
    end_at: &str,
    max_participants: i32,
    meeting_url: &str,
) -> Result<CourseFields, ApiError> {
    let skill_id = validation::uuid(skill_id).map_err(|_| field_error())?;
    if validation::non_blank(name).is_err() || validation::non_blank(description).is_err() {
        return Err(field_error());
    }
    let start_at = parse_schedule(start_at)?;
    let end_at = parse_schedule(end_at)?;
    if validation::positive(max_participants).is_err() {
        return Err(field_error());
    }
    if validation::secure_url(meeting_url).is_err() {
        return Err(field_error());
    }
    Ok(CourseFields {
        skill_id,
        start_at,
        end_at,
    })
}

#[instrument(skip(state, req))]
pub async fn create_course(
    State(state): State<AppState>,
    CoachUser(caller): CoachUser,
    ApiJson(req): ApiJson<CreateCourseRequest>,
) -> ApiResult<impl IntoResponse> {
    let owner_id = validation::uuid(&req.user_id).map_err(|_| field_error())?;
    let fields = check_course_fields(
        &req.skill_id,
        &req.name,
        &req.description,
        &req.start_at,
        &req.end_at,
        req.max_participants,
        &req.meeting_url,
    )?;

    let owner = users_repo::find_by_id(&state.db, owner_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("使用者不存在"))?;
    if !owner.is_coach() {
        return Err(ApiError::bad_request("使用者尚未成為教練"));
    }
    if skills_repo::find_by_id(&state.db, fields.skill_id).await?.is_none() {
        return Err(ApiError::bad_request("專長不存在"));
    }

    let course = courses_repo::insert(
        &state.db,
        NewCourse {
            user_id: owner_id,
            skill_id: fields.skill_id,
            name: &req.name,
            description: &req.description,
            start_at: fields.start_at,
            end_at: fields.end_at,
            max_participants: req.max_participants,
            meeting_url: &req.meeting_url,
        },
    )
    .await?;
    info!(course_id = %course.id, owner_id = %owner_id, caller_id = %caller.id, "course created");

    Ok(response::created(CourseData { course }))
}

#[instrument(skip(state, caller, req))]
pub async fn update_course(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(course_id): Path<String>,
    ApiJson(req): ApiJson<UpdateCourseRequest>,
) -> ApiResult<impl IntoResponse> {
    let course_id = validation::uuid(&course_id).map_err(|_| field_error())?;
    let fields = check_course_fields(
        &req.skill_id,
        &req.name,
        &req.description,
        &req.start_at,
        &req.end_at,
        req.max_participants,
        &req.meeting_url,
    )?;

    if courses_repo::find_by_id(&state.db, course_id).await?.is_none() {
        return Err(ApiError::bad_request("課程不存在"));
    }
    if skills_repo::find_by_id(&state.db, fields.skill_id).await?.is_none() {
        return Err(ApiError::bad_request("專長不存在"));
    }

    let affected = courses_repo::update_full(
        &state.db,
        course_id,
        CourseChanges {
            skill_id: fields.skill_id,
            name: &req.name,
            description: &req.description,
            start_at: fields.start_at,
            end_at: fields.end_at,
            max_participants: req.max_participants,
            meeting_url: &req.meeting_url,
        },
    )
    .await?;
    if affected == 0 {
        return Err(ApiError::bad_request("更新課程失敗"));
    }

    let saved_course = courses_repo::find_by_id(&state.db, course_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("course {} vanished after update", course_id))?;
    info!(%course_id, caller_id = %caller.id, "course updated");

    Ok(response::ok(SavedCourseData { saved_course }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_must_be_rfc3339() {
        assert!(parse_schedule("2024-06-01T10:00:00Z").is_ok());
        assert!(parse_schedule("2024-06-01T10:00:00+08:00").is_ok());
        assert!(parse_schedule("2024-06-01 10:00").is_err());
        assert!(parse_schedule("next tuesday").is_err());
        assert!(parse_schedule("").is_err());
    }

    #[test]
    fn course_fields_reject_bad_capacity_and_url() {
        let check = |max: i32, url: &str| {
            check_course_fields(
                "6f3b9e1e-8a2d-4c7b-9a11-3d2f4b5a6c7d",
                "瑜伽入門",
                "基礎課程",
                "2024-06-01T10:00:00Z",
                "2024-06-01T12:00:00Z",
                max,
                url,
            )
        };
        assert!(check(10, "https://meet.example.com/1").is_ok());
        assert!(check(0, "https://meet.example.com/1").is_err());
        assert!(check(10, "http://x").is_err());
    }

    #[test]
    fn saved_course_payload_uses_camel_case_key() {
        let course = crate::courses::repo::Course {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            skill_id: uuid::Uuid::new_v4(),
            name: "重訓".into(),
            description: "槓鈴基礎".into(),
            start_at: time::macros::datetime!(2024-06-01 10:00 UTC),
            end_at: time::macros::datetime!(2024-06-01 12:00 UTC),
            max_participants: 8,
            meeting_url: "https://meet.example.com/1".into(),
            created_at: time::macros::datetime!(2024-05-01 09:00 UTC),
            updated_at: time::macros::datetime!(2024-05-02 09:00 UTC),
        };
        let json = serde_json::to_value(SavedCourseData { saved_course: course }).unwrap();
        assert!(json.get("savedCourse").is_some());
        assert_eq!(json["savedCourse"]["max_participants"], 8);
    }
}
