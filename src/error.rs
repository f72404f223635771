use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure half of the response envelope: `{"status":"failed","message":..}`.
#[derive(Debug, Serialize)]
struct FailedBody {
    status: &'static str,
    message: String,
}

/// Envelope for unexpected errors. No message: details stay in the logs.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            Self::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            Self::Conflict(m) => (StatusCode::CONFLICT, m),
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { status: "error" }))
                    .into_response();
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { status: "error" }))
                    .into_response();
            }
        };
        tracing::warn!(status = %code, %message, "request rejected");
        (
            code,
            Json(FailedBody {
                status: "failed",
                message,
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
