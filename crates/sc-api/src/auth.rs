use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Rejects any request whose `Authorization` header is not exactly
/// `Bearer <expected token>`. Mirrors the middleware this was distilled
/// from field for field: missing header, wrong shape, and wrong token are
/// three distinct 401s, none of which leak which one occurred.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(request).await;
    };

    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(header) = header else {
        return unauthorized("Missing Authorization header");
    };

    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return unauthorized("Invalid Authorization header format");
    }
    if parts[1] != expected {
        return unauthorized("Invalid token");
    }

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
