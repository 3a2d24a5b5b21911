use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Uniform envelope returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::OK, Some(data), message)
}

pub fn created<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::CREATED, Some(data), message)
}

pub fn empty_success(message: impl Into<String>) -> Response {
    with_status::<()>(StatusCode::OK, None, message)
}

fn with_status<T>(status: StatusCode, data: Option<T>, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data,
        message: message.into(),
        error: None,
    };
    (status, Json(body)).into_response()
}

pub fn failure(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        message: message.into(),
        error: Some(error.into()),
    };
    (status, Json(body)).into_response()
}
