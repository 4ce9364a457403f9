use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors a webhook adapter can hit while decoding or validating a
/// request body, before an intent is ever placed on the bus.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("failed to enqueue intent: bus closed")]
    BusClosed,
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        let status = match self {
            AdapterError::InvalidBody(_) | AdapterError::Validation(_) => StatusCode::BAD_REQUEST,
            AdapterError::BusClosed => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
