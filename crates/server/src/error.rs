use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use manager::ManagerError;
use serde_json::json;
use thiserror::Error;

/// Top-level HTTP error, converting the library crates' errors into JSON
/// responses the way the teacher's `crates/server/src/error.rs::ServerError`
/// wraps `IndexError`/`IngestError` with `#[from]`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Manager(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
