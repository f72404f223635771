use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::errors::ErrorKind;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::jwt::JwtKeys,
    error::ApiError,
    state::AppState,
    users::repo::{self, ROLE_COACH},
};

/// Authenticated caller. Loaded from the users table after JWT verification,
/// so a token for a deleted account stops working immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_coach(&self) -> bool {
        self.role == ROLE_COACH
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("請先登入"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("請先登入"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::unauthorized("Token 已過期"),
                _ => ApiError::unauthorized("無效的 token"),
            }
        })?;

        let user = repo::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("無效的 token"))?;

        Ok(AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }
}

/// Coach-role guard layered on `AuthUser`.
pub struct CoachUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for CoachUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_coach() {
            return Err(ApiError::unauthorized("使用者尚未成為教練"));
        }
        Ok(CoachUser(user))
    }
}
