use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::context::CurrentUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The caller as seen by the API: id, email and every claim in its token.
pub async fn whoami(CurrentUser(principal): CurrentUser) -> impl IntoResponse {
    Json(json!({
        "id": principal.user_id,
        "email": principal.email,
        "claims": principal.claims,
    }))
}
