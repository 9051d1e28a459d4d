use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    UpstreamUnreachable,
    UpstreamContract(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::UpstreamUnreachable => {
                (StatusCode::BAD_GATEWAY, "upstream unreachable".to_string())
            }
            AppError::UpstreamContract(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::InternalServerError(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(json!({ "error": error, "status": "error" }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::InternalServerError(err.into())
    }
}
