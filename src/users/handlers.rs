use axum::{
    extract::{FromRef, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{extractors::AuthUser, jwt::JwtKeys, password},
    error::{ApiError, ApiResult},
    extract::ApiJson,
    response,
    state::AppState,
    validation,
};

use super::{
    dto::{
        CreatedUser, LoginData, LoginRequest, LoginUser, ProfileData, ProfileUser, SignupData,
        SignupRequest, UpdateProfileRequest,
    },
    repo,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state, req))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    if validation::non_blank(&req.name).is_err()
        || validation::non_blank(&req.password).is_err()
        || validation::non_blank(&req.email).is_err()
    {
        return Err(ApiError::bad_request("欄位未填寫正確"));
    }
    if validation::password(&req.password).is_err() {
        return Err(ApiError::bad_request(
            "密碼不符合規則，需要包含英文數字大小寫，最短8個字，最長16個字",
        ));
    }
    if validation::user_name(&req.name).is_err() {
        return Err(ApiError::bad_request(
            "使用者名稱不符合規則，最少2個字，最多10個字，不可包含任何特殊符號與空白",
        ));
    }
    if validation::email(&req.email).is_err() {
        return Err(ApiError::bad_request("不符合Email的格式字串"));
    }

    if repo::find_by_email(&state.db, &req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::conflict("Email 已被使用"));
    }

    let hash = password::hash_password(&req.password)?;
    let user = repo::insert(&state.db, &req.name, &req.email, repo::ROLE_USER, &hash).await?;
    info!(user_id = %user.id, "user created");

    Ok(response::created(SignupData {
        user: CreatedUser {
            id: user.id,
            name: user.name,
        },
    }))
}

#[instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if validation::email(&req.email).is_err() {
        return Err(ApiError::bad_request("不符合Email的格式字串"));
    }
    if validation::password(&req.password).is_err() {
        return Err(ApiError::bad_request(
            "密碼不符合規則，需要包含英文數字大小寫，最短8個字，最長16個字",
        ));
    }

    let user = repo::find_by_email(&state.db, &req.email).await?.ok_or_else(|| {
        warn!(email = %req.email, "login with unknown email");
        ApiError::bad_request("使用者不存在或密碼輸入錯誤")
    })?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::bad_request("使用者不存在或密碼輸入錯誤"));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");

    // Login responds 201, not 200.
    Ok(response::created(LoginData {
        token,
        user: LoginUser { name: user.name },
    }))
}

#[instrument(skip(user))]
pub async fn get_profile(user: AuthUser) -> ApiResult<impl IntoResponse> {
    Ok(response::ok(ProfileData {
        user: ProfileUser {
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, user, req))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    if validation::user_name(&req.name).is_err() {
        return Err(ApiError::bad_request(
            "使用者名稱不符合規則，最少2個字，最多10個字，不可包含任何特殊符號與空白",
        ));
    }
    if req.name == user.name {
        return Err(ApiError::bad_request("使用者名稱未變更"));
    }

    let affected = repo::update_name(&state.db, user.id, &user.name, &req.name).await?;
    if affected == 0 {
        warn!(user_id = %user.id, "rename lost to a concurrent update");
        return Err(ApiError::bad_request("更新使用者失敗"));
    }
    info!(user_id = %user.id, "user renamed");

    Ok(response::ok_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_payload_has_token_and_user_name() {
        let data = LoginData {
            token: "signed.jwt.token".into(),
            user: LoginUser { name: "小明".into() },
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["user"]["name"], "小明");
        assert!(json["token"].is_string());
    }

    #[test]
    fn signup_payload_exposes_only_id_and_name() {
        let data = SignupData {
            user: CreatedUser {
                id: uuid::Uuid::new_v4(),
                name: "Alice".into(),
            },
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json["user"]["id"].is_string());
        assert_eq!(json["user"]["name"], "Alice");
        assert!(json["user"].get("email").is_none());
    }
}
