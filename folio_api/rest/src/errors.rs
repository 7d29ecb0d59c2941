use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub fn error(code: StatusCode, error: impl Serialize) -> Response {
    (code, Json(ApiError { error })).into_response()
}

#[derive(Serialize)]
pub struct ApiError<E> {
    pub error: E,
}
