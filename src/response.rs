use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success half of the response envelope: `{"status":"success","data"?:..}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            data: Some(data),
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            status: "success",
            data: Some(data),
        }),
    )
}

pub fn ok_empty() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::OK,
        Json(Envelope {
            status: "success",
            data: None,
        }),
    )
}

pub fn created_empty() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::CREATED,
        Json(Envelope {
            status: "success",
            data: None,
        }),
    )
}
